use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid feed URL \"{url}\": {reason}")]
    InvalidFeedUrl { url: String, reason: String },

    #[error("response from {url} exceeds {limit} bytes")]
    ResponseTooLarge { url: String, limit: usize },

    #[error("JSON parse error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed {format} document: {reason}")]
    Document { format: String, reason: String },

    #[error("run cancelled before completion")]
    Cancelled,
}

impl ScraperError {
    /// `true` for errors raised while turning a fetched body into records.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ScraperError::Json { .. } | ScraperError::Xml(_) | ScraperError::Document { .. }
        )
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScraperError::Cancelled)
    }
}
