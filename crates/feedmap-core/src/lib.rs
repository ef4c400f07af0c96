pub mod app_config;
pub mod config;
pub mod currency;
pub mod feeds;
pub mod format;
pub mod products;
pub mod record;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use currency::CurrencyCode;
pub use feeds::{load_feeds, FeedConfig, FeedsFile};
pub use format::FeedFormat;
pub use products::{CanonicalProduct, LocalizedText, Money, DISPLAY_LANGUAGE};
pub use record::{fields, MappingOutcome, RawRecord, RejectionReason};
pub use report::{MappingReport, Rejection, ReportBuilder};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid currency code \"{0}\": expected three ASCII letters")]
    InvalidCurrency(String),

    #[error("unknown feed format \"{0}\": expected json, xml, or raw")]
    UnknownFormat(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read feeds file {path}: {source}")]
    FeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feeds file: {0}")]
    FeedsFileParse(#[source] serde_yaml::Error),

    #[error("feeds validation error: {0}")]
    Validation(String),
}
