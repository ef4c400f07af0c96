//! Untyped feed records and the per-record mapping outcome.
//!
//! Parsers produce [`RawRecord`]s using the canonical names in [`fields`]
//! where they know the meaning of a column (raw and XML feeds); JSON feeds
//! keep whatever keys the document used, which is why lookups ignore ASCII
//! case (`listPrice` and `ListPrice` both occur in the wild).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CanonicalProduct;

/// Canonical field names understood by the record mapper.
pub mod fields {
    pub const PRODUCT_ID: &str = "productId";
    pub const PRODUCT_NAME: &str = "productName";
    pub const LIST_PRICE: &str = "listPrice";
    pub const SALES_PRICE: &str = "salesPrice";
    /// Currency quoted next to the list price, when the feed states one.
    pub const LIST_PRICE_CURRENCY: &str = "listPriceCurrency";
    /// Currency quoted next to the sales price, when the feed states one.
    pub const SALES_PRICE_CURRENCY: &str = "salesPriceCurrency";
}

/// One feed entry exactly as extracted by a parser, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Zero-based index of the parsed unit this record came from.
    pub position: usize,
    entries: Vec<(String, String)>,
}

impl RawRecord {
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self {
            position,
            entries: Vec::new(),
        }
    }

    /// Appends a field, keeping insertion order. Later duplicates are kept
    /// but shadowed by the first occurrence on lookup.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style [`Self::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Looks up a field by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Looks up a field and returns it trimmed, treating blank values as absent.
    #[must_use]
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifies the record in warnings: its product id when present,
    /// otherwise `#<position>`.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.get_non_blank(fields::PRODUCT_ID)
            .map_or_else(|| format!("#{}", self.position), str::to_owned)
    }
}

/// Why a record could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// A required field is absent or blank.
    MissingField { field: String },
    /// A price field is not a non-negative decimal, or names an unusable currency.
    InvalidPrice { field: String, value: String },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingField { field } => {
                write!(f, "missing required field \"{field}\"")
            }
            RejectionReason::InvalidPrice { field, value } => {
                write!(f, "invalid price in \"{field}\": \"{value}\"")
            }
        }
    }
}

/// Result of mapping a single [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    Mapped(CanonicalProduct),
    Rejected {
        record: RawRecord,
        reason: RejectionReason,
    },
}

impl MappingOutcome {
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        matches!(self, MappingOutcome::Mapped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_ignores_ascii_case() {
        let record = RawRecord::new(0).with("ListPrice", "$10.00");
        assert_eq!(record.get("listPrice"), Some("$10.00"));
        assert_eq!(record.get("LISTPRICE"), Some("$10.00"));
    }

    #[test]
    fn get_returns_first_duplicate() {
        let record = RawRecord::new(0)
            .with("productId", "first")
            .with("ProductId", "second");
        assert_eq!(record.get("productid"), Some("first"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn get_non_blank_trims_and_filters() {
        let record = RawRecord::new(0)
            .with("productName", "  Widget  ")
            .with("productId", "   ");
        assert_eq!(record.get_non_blank("productName"), Some("Widget"));
        assert_eq!(record.get_non_blank("productId"), None);
        assert_eq!(record.get_non_blank("absent"), None);
    }

    #[test]
    fn identifier_prefers_product_id() {
        let record = RawRecord::new(4).with(fields::PRODUCT_ID, " 42 ");
        assert_eq!(record.identifier(), "42");
    }

    #[test]
    fn identifier_falls_back_to_position() {
        let record = RawRecord::new(4).with(fields::PRODUCT_NAME, "Widget");
        assert_eq!(record.identifier(), "#4");
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let record = RawRecord::new(0).with("b", "2").with("a", "1");
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn rejection_reason_display() {
        let missing = RejectionReason::MissingField {
            field: "salesPrice".to_string(),
        };
        assert_eq!(missing.to_string(), "missing required field \"salesPrice\"");
        let invalid = RejectionReason::InvalidPrice {
            field: "listPrice".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(invalid.to_string(), "invalid price in \"listPrice\": \"abc\"");
    }
}
