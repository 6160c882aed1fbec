pub enum Path {
    Portfolio,
}

impl Path {
    pub fn as_str(&self) -> &'static str {
        match self {
            Path::Portfolio => "/",
        }
    }
}
