use feedmap_core::{fields, RawRecord};

use super::{ParsedUnit, StructuralSkip, RAW_MIN_FIELDS};

/// Parses a pipe-delimited product table.
///
/// The first `header_rows` lines are dropped unconditionally. Remaining
/// lines are split on `|`, each column is trimmed and empty columns (from
/// leading/trailing or doubled pipes) are discarded. Whitespace-only lines
/// are not entries at all and do not advance the position counter.
///
/// Column layout after filtering:
///
/// | index | meaning |
/// |-------|---------|
/// | 0 | product id |
/// | 1, 2 | product name and brand, joined with a space |
/// | 3 | sales price (`$`-prefixed) |
/// | 4 | list price (`$`-prefixed) |
///
/// Lines with fewer than [`RAW_MIN_FIELDS`] columns become structural skips.
#[must_use]
pub fn parse_raw_feed(body: &str, header_rows: usize) -> Vec<ParsedUnit> {
    body.lines()
        .skip(header_rows)
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(position, line)| parse_line(position, line))
        .collect()
}

fn parse_line(position: usize, line: &str) -> ParsedUnit {
    let columns: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    if columns.len() < RAW_MIN_FIELDS {
        return ParsedUnit::Skipped(StructuralSkip {
            position,
            identifier: columns.first().map(|id| (*id).to_string()),
            reason: format!(
                "line has {} fields, at least {RAW_MIN_FIELDS} required",
                columns.len()
            ),
        });
    }

    let record = RawRecord::new(position)
        .with(fields::PRODUCT_ID, columns[0])
        .with(fields::PRODUCT_NAME, format!("{} {}", columns[1], columns[2]))
        .with(fields::SALES_PRICE, columns[3])
        .with(fields::LIST_PRICE, columns[4]);

    ParsedUnit::Record(record)
}
