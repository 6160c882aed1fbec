pub mod ticker {
    pub const DEFAULT_URL: &str = "https://api.coinmarketcap.com/v1/ticker/";
    /// Number of top assets requested on every refresh.
    pub const LIMIT: usize = 200;
    /// Number of assets offered to the URL builder on the help page.
    pub const URL_BUILDER_LIMIT: usize = 50;
}

pub mod defaults {
    pub const PORT: u16 = 80;
    pub const IP: &str = "0.0.0.0";
    pub const STATIC_DIR: &str = "public";
    pub const REFRESH_INTERVAL_SECS: u64 = 55;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Upper bound on one upstream fetch; below both the refresh period and
    /// the request timeout.
    pub const FETCH_TIMEOUT_SECS: u64 = 10;
}
