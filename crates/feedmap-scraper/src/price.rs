//! Price string normalization.
//!
//! Feeds quote prices as `"$19.99"`, `"19.99 USD"`, `"USD 19.99"` or a bare
//! `"19.99"`. Everything but the decimal amount is stripped before parsing,
//! and the letter code, when present, is returned separately so callers can
//! honour a feed's per-field currency.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Currency symbols stripped from either end of a price string.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Why a price string could not be turned into an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    NotANumber,
    Negative,
}

/// Splits `"19.99 USD"` into `("19.99", Some("USD"))`.
///
/// A code is recognised only when it is a whitespace-separated run of exactly
/// three ASCII letters at the start or end of the string. Anything else is
/// left in the amount part untouched.
#[must_use]
pub fn split_currency(raw: &str) -> (&str, Option<&str>) {
    let trimmed = raw.trim();

    if let Some((amount, code)) = trimmed.rsplit_once(char::is_whitespace) {
        if is_letter_code(code) {
            return (amount.trim(), Some(code));
        }
    }
    if let Some((code, amount)) = trimmed.split_once(char::is_whitespace) {
        if is_letter_code(code) {
            return (amount.trim(), Some(code));
        }
    }
    (trimmed, None)
}

fn is_letter_code(s: &str) -> bool {
    s.len() == 3 && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Parses a price string into a non-negative decimal amount.
///
/// # Errors
///
/// - [`PriceError::Empty`] when nothing but symbols and whitespace remain.
/// - [`PriceError::NotANumber`] when the remainder is not a decimal.
/// - [`PriceError::Negative`] for amounts below zero.
pub fn parse_price(raw: &str) -> Result<Decimal, PriceError> {
    let (amount, _code) = split_currency(raw);

    // A leading minus may sit outside the symbol (`-$5.00`) or inside it
    // (`$-5.00`); normalise both before stripping.
    let (negative, unsigned) = match amount.trim().strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount.trim()),
    };
    let cleaned = unsigned.trim_matches(CURRENCY_SYMBOLS).trim();
    let (negative, cleaned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (negative, cleaned),
    };

    if cleaned.is_empty() {
        return Err(PriceError::Empty);
    }
    if !cleaned
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'.' || b == b',')
    {
        return Err(PriceError::NotANumber);
    }

    let value = Decimal::from_str(&strip_thousands(cleaned)?).map_err(|_| PriceError::NotANumber)?;
    if negative && !value.is_zero() {
        return Err(PriceError::Negative);
    }
    Ok(value)
}

/// Removes `,` thousands separators. A comma is only accepted as a grouping
/// separator when a `.` decimal point is also present, so `"1,299.99"` is
/// fine but `"12,50"` is ambiguous and rejected.
fn strip_thousands(s: &str) -> Result<String, PriceError> {
    if !s.contains(',') {
        return Ok(s.to_string());
    }
    if !s.contains('.') {
        return Err(PriceError::NotANumber);
    }
    Ok(s.replace(',', ""))
}
