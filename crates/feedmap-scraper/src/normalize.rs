//! Mapping from parsed [`RawRecord`]s to [`CanonicalProduct`]s.
//!
//! Price string handling is delegated to [`crate::price`]; this module
//! decides which fields are required and how rejections are reported.

use feedmap_core::{
    fields, CanonicalProduct, CurrencyCode, LocalizedText, MappingOutcome, Money, RawRecord,
    RejectionReason,
};
use rust_decimal::Decimal;

use crate::price::{parse_price, split_currency};

/// Accepted spellings for each required field, canonical name first.
/// Lookups are already case-insensitive, so only genuinely different names
/// need listing here.
const ID_FIELDS: &[&str] = &[fields::PRODUCT_ID, "id"];
const NAME_FIELDS: &[&str] = &[fields::PRODUCT_NAME, "name", "title"];
const LIST_PRICE_FIELDS: &[&str] = &[fields::LIST_PRICE, "price"];
const SALES_PRICE_FIELDS: &[&str] = &[fields::SALES_PRICE, "salePrice", "sale_price"];

/// Maps one record to a product, or explains why it cannot be mapped.
///
/// Never panics on malformed input: every failure is a
/// [`MappingOutcome::Rejected`]. Checks run in a fixed order (presence of
/// id, name, list price, sales price; then list price, then sales price
/// parsing), so the reported reason is deterministic.
///
/// Prices use the currency the record states for that field (XML feeds
/// quote one per price) and fall back to `default_currency` otherwise.
#[must_use]
pub fn map_record(record: RawRecord, default_currency: &CurrencyCode) -> MappingOutcome {
    match build_product(&record, default_currency) {
        Ok(product) => MappingOutcome::Mapped(product),
        Err(reason) => MappingOutcome::Rejected { record, reason },
    }
}

fn build_product(
    record: &RawRecord,
    default_currency: &CurrencyCode,
) -> Result<CanonicalProduct, RejectionReason> {
    let id = required(record, ID_FIELDS)?;
    let name = required(record, NAME_FIELDS)?;
    let list_raw = required(record, LIST_PRICE_FIELDS)?;
    let sales_raw = required(record, SALES_PRICE_FIELDS)?;

    let list_price = money(
        record,
        fields::LIST_PRICE,
        list_raw,
        fields::LIST_PRICE_CURRENCY,
        default_currency,
    )?;
    let sales_price = money(
        record,
        fields::SALES_PRICE,
        sales_raw,
        fields::SALES_PRICE_CURRENCY,
        default_currency,
    )?;

    Ok(CanonicalProduct {
        id: id.to_string(),
        display_name: LocalizedText::english(name),
        list_price,
        sales_price,
    })
}

/// First non-blank value among `names`, trimmed.
fn required<'a>(record: &'a RawRecord, names: &[&str]) -> Result<&'a str, RejectionReason> {
    names
        .iter()
        .find_map(|name| record.get_non_blank(name))
        .ok_or_else(|| RejectionReason::MissingField {
            field: names[0].to_string(),
        })
}

fn money(
    record: &RawRecord,
    field: &str,
    raw: &str,
    currency_field: &str,
    default_currency: &CurrencyCode,
) -> Result<Money, RejectionReason> {
    let invalid = || RejectionReason::InvalidPrice {
        field: field.to_string(),
        value: raw.to_string(),
    };

    let amount: Decimal = parse_price(raw).map_err(|_| invalid())?;

    // An explicit currency field wins; otherwise a code embedded in the
    // price string itself ("19.99 USD"); otherwise the configured default.
    let stated = record
        .get_non_blank(currency_field)
        .or_else(|| split_currency(raw).1);
    let currency = match stated {
        Some(code) => CurrencyCode::parse(code).map_err(|_| invalid())?,
        None => default_currency.clone(),
    };

    Ok(Money::new(currency, amount))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
