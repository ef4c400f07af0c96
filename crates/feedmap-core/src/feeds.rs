use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, CurrencyCode, FeedFormat};

/// One named feed in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    pub format: FeedFormat,
    /// Currency applied to prices the feed does not label itself.
    pub currency: CurrencyCode,
    /// Raw feeds only: leading lines to skip. Falls back to the global
    /// `FEEDMAP_RAW_HEADER_ROWS` when absent.
    #[serde(default)]
    pub header_rows: Option<usize>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedConfig>,
}

impl FeedsFile {
    /// Finds a feed by name, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FeedConfig> {
        self.feeds.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Load and validate the feed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_feeds(&content)
}

fn parse_feeds(content: &str) -> Result<FeedsFile, ConfigError> {
    let feeds_file: FeedsFile =
        serde_yaml::from_str(content).map_err(ConfigError::FeedsFileParse)?;

    validate_feeds(&feeds_file)?;

    Ok(feeds_file)
}

fn validate_feeds(feeds_file: &FeedsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for feed in &feeds_file.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }

        if feed.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has an empty url",
                feed.name
            )));
        }

        if feed.header_rows == Some(0) {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has header_rows 0; raw feeds carry at least one header row",
                feed.name
            )));
        }

        if !seen_names.insert(feed.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }
    }

    Ok(())
}
