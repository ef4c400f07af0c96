use feedmap_core::RawRecord;
use serde_json::Value;

use super::{ParsedUnit, StructuralSkip};
use crate::error::ScraperError;

/// Parses a JSON array of flat product objects.
///
/// Keys are kept exactly as the document spells them and in document order;
/// the mapper's lookups are case-insensitive. A leading byte order mark is
/// ignored. Strings are copied verbatim, numbers and booleans
/// are rendered as text, and `null` or nested values are left out so they
/// read as missing.
///
/// # Errors
///
/// - [`ScraperError::Json`] if the body is not valid JSON.
/// - [`ScraperError::Document`] if the top-level value is not an array.
pub fn parse_json_feed(body: &str) -> Result<Vec<ParsedUnit>, ScraperError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let document: Value = serde_json::from_str(body).map_err(|e| ScraperError::Json {
        context: "product feed".to_string(),
        source: e,
    })?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(ScraperError::Document {
                format: "json".to_string(),
                reason: format!("expected a top-level array, found {}", kind(&other)),
            })
        }
    };

    let units = items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(map) => {
                let mut record = RawRecord::new(position);
                for (key, value) in map {
                    if let Some(text) = scalar_text(value) {
                        record.push(key, text);
                    }
                }
                ParsedUnit::Record(record)
            }
            other => ParsedUnit::Skipped(StructuralSkip {
                position,
                identifier: None,
                reason: format!("array element is {}, not an object", kind(&other)),
            }),
        })
        .collect();

    Ok(units)
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
