use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CurrencyCode;

/// Language tag attached to every display name. Feeds carry a single locale.
pub const DISPLAY_LANGUAGE: &str = "en";

/// A product mapped from a feed record, validated and normalized so that
/// downstream catalog adapters never see feed-specific field names or
/// price formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Feed-supplied product key, trimmed. Never empty.
    pub id: String,
    pub display_name: LocalizedText,
    /// Regular (pre-discount) price.
    pub list_price: Money,
    /// Price the product currently sells for.
    pub sales_price: Money,
}

/// Text tagged with the language it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

impl LocalizedText {
    /// Wraps `text` with the fixed [`DISPLAY_LANGUAGE`] tag.
    #[must_use]
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            language: DISPLAY_LANGUAGE.to_string(),
            text: text.into(),
        }
    }
}

/// A non-negative amount in a single currency.
///
/// Amounts are serialized as decimal strings (`"19.99"`) to avoid float
/// rounding on the way to catalog APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl Money {
    #[must_use]
    pub fn new(currency: CurrencyCode, amount: Decimal) -> Self {
        Self { currency, amount }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
