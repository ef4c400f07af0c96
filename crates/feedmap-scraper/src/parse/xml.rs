//! Google Shopping (RSS) feed parser.
//!
//! Only direct children of each `<item>` are read. `g:id`, `g:price` and
//! `g:sale_price` are matched by namespace URI rather than prefix, so a feed
//! that binds the Google namespace to another prefix still parses. Feeds that
//! use the conventional `g:` prefix without declaring it are accepted too.

use feedmap_core::{fields, RawRecord};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::{ParsedUnit, StructuralSkip};
use crate::error::ScraperError;
use crate::price::split_currency;

/// Namespace URI of the Google Shopping product attributes.
pub const GOOGLE_SHOPPING_NS: &[u8] = b"http://base.google.com/ns/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Id,
    Title,
    Price,
    SalePrice,
}

#[derive(Debug, Default)]
struct ItemBuffer {
    id: String,
    title: String,
    price: String,
    sale_price: String,
}

impl ItemBuffer {
    fn slot(&self, field: ItemField) -> &str {
        match field {
            ItemField::Id => &self.id,
            ItemField::Title => &self.title,
            ItemField::Price => &self.price,
            ItemField::SalePrice => &self.sale_price,
        }
    }

    /// A field counts as filled once an earlier element gave it non-blank text.
    fn is_filled(&self, field: ItemField) -> bool {
        !self.slot(field).trim().is_empty()
    }

    fn push_text(&mut self, field: ItemField, text: &str) {
        let target = match field {
            ItemField::Id => &mut self.id,
            ItemField::Title => &mut self.title,
            ItemField::Price => &mut self.price,
            ItemField::SalePrice => &mut self.sale_price,
        };
        target.push_str(text);
    }

    fn into_unit(self, position: usize) -> ParsedUnit {
        let id = self.id.trim();
        let title = self.title.trim();
        let price = self.price.trim();

        let missing: Vec<&str> = [("g:id", id), ("title", title), ("g:price", price)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return ParsedUnit::Skipped(StructuralSkip {
                position,
                identifier: (!id.is_empty()).then(|| id.to_string()),
                reason: format!("item missing {}", missing.join(", ")),
            });
        }

        let (list_amount, list_currency) = split_currency(price);
        let sale = self.sale_price.trim();
        let (sale_amount, sale_currency) = if sale.is_empty() {
            (list_amount, list_currency)
        } else {
            split_currency(sale)
        };

        let mut record = RawRecord::new(position)
            .with(fields::PRODUCT_ID, id)
            .with(fields::PRODUCT_NAME, title)
            .with(fields::LIST_PRICE, list_amount)
            .with(fields::SALES_PRICE, sale_amount);
        if let Some(code) = list_currency {
            record.push(fields::LIST_PRICE_CURRENCY, code);
        }
        if let Some(code) = sale_currency {
            record.push(fields::SALES_PRICE_CURRENCY, code);
        }
        ParsedUnit::Record(record)
    }
}

fn classify(ns: &ResolveResult<'_>, local: &[u8]) -> Option<ItemField> {
    let google = match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == GOOGLE_SHOPPING_NS,
        ResolveResult::Unknown(prefix) => prefix.as_slice() == b"g",
        ResolveResult::Unbound => false,
    };
    match (google, local) {
        (true, b"id") => Some(ItemField::Id),
        (true, b"price") => Some(ItemField::Price),
        (true, b"sale_price") => Some(ItemField::SalePrice),
        (false, b"title") if matches!(ns, ResolveResult::Unbound) => Some(ItemField::Title),
        _ => None,
    }
}

fn is_item(ns: &ResolveResult<'_>, local: &[u8]) -> bool {
    matches!(ns, ResolveResult::Unbound) && local == b"item"
}

fn malformed(reason: impl Into<String>) -> ScraperError {
    ScraperError::Document {
        format: "xml".to_string(),
        reason: reason.into(),
    }
}

/// Parses a Google Shopping RSS feed into one unit per `<item>`.
///
/// Items lacking `g:id`, `title` or `g:price` become structural skips. A
/// missing or empty `g:sale_price` falls back to the list price. When an item
/// repeats a field, the first non-blank occurrence is kept. Prices are
/// split into a bare amount and, when quoted, a currency code.
///
/// # Errors
///
/// - [`ScraperError::Xml`] for syntax errors (including mismatched tags).
/// - [`ScraperError::Document`] when the body has no root element or ends
///   with elements still open.
pub fn parse_google_shopping_feed(body: &str) -> Result<Vec<ParsedUnit>, ScraperError> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut units = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut item: Option<(usize, ItemBuffer)> = None;
    let mut current: Option<ItemField> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                let local = e.local_name();
                match item.as_ref().map(|(item_depth, _)| *item_depth) {
                    Some(item_depth) if depth == item_depth + 1 => {
                        // Repeated elements: the first non-blank occurrence wins.
                        current = classify(&ns, local.as_ref()).filter(|field| {
                            item.as_ref()
                                .is_some_and(|(_, buffer)| !buffer.is_filled(*field))
                        });
                    }
                    Some(_) => {}
                    None if is_item(&ns, local.as_ref()) => {
                        item = Some((depth, ItemBuffer::default()));
                    }
                    None => {}
                }
            }
            (ns, Event::Empty(e)) => {
                saw_root = true;
                if item.is_none() && is_item(&ns, e.local_name().as_ref()) {
                    units.push(ItemBuffer::default().into_unit(units.len()));
                }
            }
            (_, Event::Text(e)) => {
                if let (Some(field), Some((_, buffer))) = (current, item.as_mut()) {
                    buffer.push_text(field, &e.unescape()?);
                }
            }
            (_, Event::CData(e)) => {
                if let (Some(field), Some((_, buffer))) = (current, item.as_mut()) {
                    buffer.push_text(field, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            (_, Event::End(_)) => {
                match item.as_ref().map(|(item_depth, _)| *item_depth) {
                    Some(item_depth) if depth == item_depth => {
                        if let Some((_, buffer)) = item.take() {
                            units.push(buffer.into_unit(units.len()));
                        }
                        current = None;
                    }
                    Some(item_depth) if depth == item_depth + 1 => current = None,
                    _ => {}
                }
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("closing tag without an open element"))?;
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(malformed("document has no root element"));
    }
    if depth != 0 {
        return Err(malformed(format!(
            "document ended with {depth} unclosed element(s)"
        )));
    }

    Ok(units)
}

#[cfg(test)]
#[path = "xml_test.rs"]
mod tests;
