use std::path::PathBuf;

use crate::CurrencyCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub feeds_path: PathBuf,
    /// Currency applied to feeds that do not quote one per price. `None`
    /// means every caller must supply it explicitly.
    pub default_currency: Option<CurrencyCode>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_body_bytes: usize,
    /// Leading lines dropped from raw text feeds before data rows begin.
    pub raw_header_rows: usize,
    pub max_concurrent_feeds: usize,
}
