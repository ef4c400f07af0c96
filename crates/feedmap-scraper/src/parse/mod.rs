//! Feed body parsers, one per [`FeedFormat`].
//!
//! Each parser turns a fetched body into an ordered list of [`ParsedUnit`]s.
//! A unit is either a [`RawRecord`] ready for mapping or a
//! [`StructuralSkip`]: something recognisable as an entry but missing the
//! fields needed to even attempt mapping. Whole-document problems are
//! returned as [`ScraperError`] parse errors instead.

mod json;
mod raw;
mod xml;

use feedmap_core::{FeedFormat, RawRecord};

use crate::error::ScraperError;

pub use json::parse_json_feed;
pub use raw::parse_raw_feed;
pub use xml::{parse_google_shopping_feed, GOOGLE_SHOPPING_NS};

/// Fewest non-empty columns a raw feed line needs to be mapped.
pub const RAW_MIN_FIELDS: usize = 5;

/// A parsed entry that never reaches the record mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralSkip {
    pub position: usize,
    /// Best-effort identifier for logs (an id if one was found).
    pub identifier: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedUnit {
    Record(RawRecord),
    Skipped(StructuralSkip),
}

/// Format-specific parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Leading lines dropped from raw feeds. Ignored by other formats.
    pub raw_header_rows: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { raw_header_rows: 2 }
    }
}

/// Parses `body` with the parser for `format`.
///
/// # Errors
///
/// Returns a parse error ([`ScraperError::is_parse_error`]) when the body is
/// not a structurally valid document of that format.
pub fn parse_feed(
    format: FeedFormat,
    body: &str,
    options: ParseOptions,
) -> Result<Vec<ParsedUnit>, ScraperError> {
    match format {
        FeedFormat::Json => parse_json_feed(body),
        FeedFormat::Xml => parse_google_shopping_feed(body),
        FeedFormat::Raw => Ok(parse_raw_feed(body, options.raw_header_rows)),
    }
}
