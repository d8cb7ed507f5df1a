//! CSV ingestion.
//!
//! The header row is validated before any record is read, so a file without a `product` column
//! never yields a partial result.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use thiserror::Error;

pub const PRODUCT_COLUMN: &str = "product";
pub const PRICE_COLUMN: &str = "price";
pub const QTY_COLUMN: &str = "qty";

const UTF8_BOM: char = '\u{feff}';

/// Errors raised while reading the input file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error(
        "CSV at {} must have the columns product, price, qty (missing '{}')",
        path.display(),
        column
    )]
    Schema { path: PathBuf, column: &'static str },
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One CSV record keyed by header name, in header order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    line: u64,
    fields: Vec<(String, String)>,
}

impl RawRow {
    /// Builds a row from `(column, value)` pairs.
    pub fn new<I, K, V>(line: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    fn from_record(headers: &[String], record: &StringRecord) -> Self {
        let line = record.position().map_or(0, |position| position.line());
        let fields = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.clone(), record.get(index).unwrap_or("").to_owned()));
        Self::new(line, fields)
    }

    /// Line number in the source file, or 0 when unknown.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of `column`; empty when the column or the field is missing.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(key, _)| key == column)
            .map_or("", |(_, value)| value.as_str())
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {{", self.line)?;
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {:?}", key, value)?;
        }
        f.write_str("}")
    }
}

/// Reads every record of the CSV at `path`, preserving file order.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<RawRow>, IngestError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(IngestError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(file, path)
}

/// Reads rows from any reader; `origin` only labels errors.
pub fn read_rows<R: io::Read>(reader: R, origin: &Path) -> Result<Vec<RawRow>, IngestError> {
    let csv_error = |source| IngestError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_start_matches(UTF8_BOM).trim().to_owned())
        .collect();

    if !headers.iter().any(|header| header == PRODUCT_COLUMN) {
        return Err(IngestError::Schema {
            path: origin.to_path_buf(),
            column: PRODUCT_COLUMN,
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(RawRow::from_record(&headers, &record));
    }

    debug!("Read {} rows from {}", rows.len(), origin.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read(input: &str) -> Result<Vec<RawRow>, IngestError> {
        read_rows(input.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn rows_keep_file_order() {
        let rows = read("product,price,qty\nWidget,10.00,2\nGadget,5,3\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(PRODUCT_COLUMN), "Widget");
        assert_eq!(rows[0].get(PRICE_COLUMN), "10.00");
        assert_eq!(rows[1].get(PRODUCT_COLUMN), "Gadget");
        assert_eq!(rows[1].get(QTY_COLUMN), "3");
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let rows = read("product\nWidget\n").unwrap();
        assert_eq!(rows[0].get(PRICE_COLUMN), "");
        assert_eq!(rows[0].get(QTY_COLUMN), "");

        let rows = read("product,price,qty\nShort,1\n").unwrap();
        assert_eq!(rows[0].get(PRICE_COLUMN), "1");
        assert_eq!(rows[0].get(QTY_COLUMN), "");
    }

    #[test]
    fn quoted_comma_decimals_survive() {
        let rows = read("product,price,qty\n\"Чай\",\"1,50\",2\n").unwrap();
        assert_eq!(rows[0].get(PRODUCT_COLUMN), "Чай");
        assert_eq!(rows[0].get(PRICE_COLUMN), "1,50");
    }

    #[test]
    fn header_without_product_is_a_schema_error() {
        let err = read("name,price,qty\nWidget,1,1\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Schema {
                column: PRODUCT_COLUMN,
                ..
            }
        ));
    }

    #[test]
    fn empty_file_is_a_schema_error() {
        assert!(matches!(read(""), Err(IngestError::Schema { .. })));
    }

    #[test]
    fn bom_and_padding_are_stripped_from_headers() {
        let rows = read("\u{feff}product , price,qty\nWidget,2,2\n").unwrap();
        assert_eq!(rows[0].get(PRODUCT_COLUMN), "Widget");
        assert_eq!(rows[0].get(PRICE_COLUMN), "2");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rows(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, IngestError::NotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        fs::write(&path, "product,price,qty\nWidget,1,1\n").unwrap();
        assert_eq!(load_rows(&path).unwrap().len(), 1);
    }

    #[test]
    fn display_lists_fields_in_header_order() {
        let row = RawRow::new(4, [("product", "Widget"), ("price", "x")]);
        assert_eq!(
            row.to_string(),
            r#"line 4: {"product": "Widget", "price": "x"}"#
        );
    }
}
