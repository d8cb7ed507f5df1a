//! Turns raw CSV rows into [`LineItem`]s.
//!
//! Blank-product rows are treated as separators and dropped silently. Rows whose price or quantity
//! does not parse are dropped with one diagnostic line each. Neither stops the remaining rows.

use std::io::{self, Write};

use log::debug;

use crate::ingest::{RawRow, PRICE_COLUMN, PRODUCT_COLUMN, QTY_COLUMN};
use crate::model::{LineItem, RowError};

/// Result of normalizing a single row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Item(LineItem),
    Blank,
    Malformed(RowError),
}

/// Items that survived normalization plus the number of rows dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub items: Vec<LineItem>,
    pub skipped_blank: usize,
    pub skipped_malformed: usize,
}

/// Trims a numeric field, accepts `,` as decimal separator and defaults blanks to `"0"`.
pub fn normalize_number(raw: &str) -> String {
    let value = raw.trim().replace(',', ".");
    if value.is_empty() {
        "0".to_owned()
    } else {
        value
    }
}

pub fn normalize(row: &RawRow) -> RowOutcome {
    let product = row.get(PRODUCT_COLUMN).trim();
    if product.is_empty() {
        return RowOutcome::Blank;
    }

    let price = normalize_number(row.get(PRICE_COLUMN));
    let quantity = normalize_number(row.get(QTY_COLUMN));

    match LineItem::parse(product, price, quantity) {
        Ok(item) => RowOutcome::Item(item),
        Err(err) => RowOutcome::Malformed(err),
    }
}

/// Normalizes every row, writing progress to `out` and diagnostics to `err`.
pub fn collect_line_items<O, E>(
    rows: &[RawRow],
    out: &mut O,
    err: &mut E,
) -> io::Result<NormalizeReport>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let mut report = NormalizeReport::default();

    for row in rows {
        match normalize(row) {
            RowOutcome::Item(item) => {
                writeln!(out, "Processing: {}...", item.product())?;
                report.items.push(item);
            }
            RowOutcome::Blank => {
                debug!("Skipping blank row at line {}", row.line());
                report.skipped_blank += 1;
            }
            RowOutcome::Malformed(reason) => {
                debug!("Row at line {} rejected: {}", row.line(), reason);
                writeln!(err, "Skipping row (invalid number): {}", row)?;
                report.skipped_malformed += 1;
            }
        }
    }

    Ok(report)
}
