use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};

use crate::constant::{defaults, ticker};

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub ticker_url: String,
    pub static_dir: PathBuf,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub fetch_timeout: Duration,
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Env var {} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

// A fetch must give up before the next periodic tick and before the request
// that triggered it times out, so stale rates can still be served.
fn check_fetch_timeout(fetch_secs: u64, refresh_secs: u64, request_secs: u64) -> Result<()> {
    anyhow::ensure!(fetch_secs > 0, "FETCH_TIMEOUT_SECS must be positive");
    anyhow::ensure!(
        fetch_secs < refresh_secs,
        "FETCH_TIMEOUT_SECS ({}) must be below REFRESH_INTERVAL_SECS ({})",
        fetch_secs,
        refresh_secs
    );
    anyhow::ensure!(
        fetch_secs < request_secs,
        "FETCH_TIMEOUT_SECS ({}) must be below REQUEST_TIMEOUT_SECS ({})",
        fetch_secs,
        request_secs
    );
    Ok(())
}

impl Config {
    /// Reads the listener, upstream and timer settings, falling back to defaults
    /// for unset variables. Call after `dotenv::dotenv()`.
    pub fn from_env() -> Result<Self> {
        let ip: std::net::IpAddr = env_or("IP", defaults::IP.parse()?)?;
        let port: u16 = env_or("PORT", defaults::PORT)?;
        let ticker_url: String = env_or("TICKER_URL", ticker::DEFAULT_URL.to_string())?;
        let static_dir: PathBuf = env_or("STATIC_DIR", PathBuf::from(defaults::STATIC_DIR))?;
        let refresh_secs: u64 = env_or("REFRESH_INTERVAL_SECS", defaults::REFRESH_INTERVAL_SECS)?;
        let timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", defaults::REQUEST_TIMEOUT_SECS)?;
        let fetch_secs: u64 = env_or("FETCH_TIMEOUT_SECS", defaults::FETCH_TIMEOUT_SECS)?;

        anyhow::ensure!(refresh_secs > 0, "REFRESH_INTERVAL_SECS must be positive");
        check_fetch_timeout(fetch_secs, refresh_secs, timeout_secs)?;

        Ok(Config {
            addr: SocketAddr::from((ip, port)),
            ticker_url,
            static_dir,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            fetch_timeout: Duration::from_secs(fetch_secs),
        })
    }
}
