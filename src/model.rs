//! Invoice content: validated line items and the fixed table layout they are rendered with.
//!
//! A [`LineItem`] can only be built through [`LineItem::parse`], so every value that reaches the
//! renderer carries a non-empty product and numeric price and quantity.

use thiserror::Error;

/// Title printed above the table.
pub const INVOICE_TITLE: &str = "Invoice";

/// Suffix appended to price and total cells.
pub const CURRENCY_SUFFIX: &str = " ₽";

/// Suffix appended to quantity cells.
pub const UNIT_SUFFIX: &str = " pcs.";

/// A table column: header label and nominal width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub width_mm: u16,
}

/// Product, price, quantity and total, in that order.
pub const COLUMNS: [Column; 4] = [
    Column {
        label: "Product",
        width_mm: 60,
    },
    Column {
        label: "Price",
        width_mm: 35,
    },
    Column {
        label: "Quantity",
        width_mm: 40,
    },
    Column {
        label: "Total",
        width_mm: 40,
    },
];

/// Why a row could not become a line item.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("product is empty")]
    EmptyProduct,
    #[error("{field} '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },
}

/// One validated invoice row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    product: String,
    unit_price: String,
    quantity: String,
    total: String,
}

impl LineItem {
    /// Builds a line item from already normalized text.
    ///
    /// `unit_price` and `quantity` are kept verbatim; only the total is derived from their parsed
    /// values and formatted with two fraction digits.
    pub fn parse(
        product: impl Into<String>,
        unit_price: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Result<Self, RowError> {
        let product = product.into();
        if product.trim().is_empty() {
            return Err(RowError::EmptyProduct);
        }

        let unit_price = unit_price.into();
        let quantity = quantity.into();
        let price_value = parse_number("price", &unit_price)?;
        let quantity_value = parse_number("qty", &quantity)?;

        Ok(Self {
            product,
            unit_price,
            quantity,
            total: format!("{:.2}", price_value * quantity_value),
        })
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn unit_price(&self) -> &str {
        &self.unit_price
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    /// Cell texts in column order, with currency and unit suffixes applied.
    pub fn cells(&self) -> [String; 4] {
        [
            self.product.clone(),
            format!("{}{}", self.unit_price, CURRENCY_SUFFIX),
            format!("{}{}", self.quantity, UNIT_SUFFIX),
            format!("{}{}", self.total, CURRENCY_SUFFIX),
        ]
    }
}

/// Parses a finite number; `NaN` and infinities are rejected like any other non-number.
fn parse_number(field: &'static str, value: &str) -> Result<f64, RowError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| RowError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

/// The transient document handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceDocument {
    title: String,
    items: Vec<LineItem>,
}

impl InvoiceDocument {
    /// Creates a document with the standard title.
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            title: INVOICE_TITLE.to_owned(),
            items,
        }
    }

    /// Replaces the title and returns the updated document.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &'static [Column] {
        &COLUMNS
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
