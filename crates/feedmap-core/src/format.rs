use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Serialization a product feed is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// JSON array of flat product objects.
    Json,
    /// RSS document with Google Shopping (`g:`) item fields.
    Xml,
    /// Pipe-delimited text table with leading header rows.
    Raw,
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedFormat::Json => write!(f, "json"),
            FeedFormat::Xml => write!(f, "xml"),
            FeedFormat::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for FeedFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(FeedFormat::Json),
            "xml" | "google-shopping" => Ok(FeedFormat::Xml),
            "raw" | "text" => Ok(FeedFormat::Raw),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}
