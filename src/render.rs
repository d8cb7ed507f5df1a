//! The render boundary: [`InvoiceDocument`] in, PDF bytes or file out.
//!
//! Every failure is reported as a [`RenderError`] so callers can tell a missing font from a layout
//! or disk problem. The PDF is produced in memory before anything touches the output path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::elements::{Break, Paragraph, TableLayout};
use genpdf::style::Style;
use genpdf::Element as _;
use log::info;
use thiserror::Error;

use crate::builder::DocumentBuilder;
use crate::elements::{cell, header_cell, GridCellDecorator};
use crate::fonts::{FontError, FontLoader};
use crate::model::InvoiceDocument;

const TITLE_FONT_SIZE: u8 = 16;

/// Errors produced while rendering an invoice.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invoice has no line items")]
    EmptyInvoice,
    #[error("font unavailable")]
    FontUnavailable(#[source] FontError),
    #[error("failed to lay out the invoice")]
    Build(#[source] genpdf::error::Error),
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A PDF written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedInvoice {
    pub path: PathBuf,
    pub size: usize,
}

/// Builds the line-item table: one header row, then one row per item.
pub fn build_table(document: &InvoiceDocument) -> Result<TableLayout, genpdf::error::Error> {
    let weights = document
        .columns()
        .iter()
        .map(|column| usize::from(column.width_mm))
        .collect();
    let mut table = TableLayout::new(weights);
    table.set_cell_decorator(GridCellDecorator::default());

    let mut header = table.row();
    for column in document.columns() {
        header.push_element(header_cell(column.label));
    }
    header.push()?;

    for item in document.items() {
        let mut row = table.row();
        for text in item.cells() {
            row.push_element(cell(text, Style::new()));
        }
        row.push()?;
    }

    Ok(table)
}

/// Renders the invoice into an in-memory PDF.
pub fn render_to_bytes(
    document: &InvoiceDocument,
    fonts: &mut FontLoader,
) -> Result<Vec<u8>, RenderError> {
    if document.is_empty() {
        return Err(RenderError::EmptyInvoice);
    }

    let font = fonts.register().map_err(RenderError::FontUnavailable)?;
    let mut pdf = DocumentBuilder::invoice()
        .with_title(document.title())
        .build(font);

    pdf.push(
        Paragraph::new(document.title())
            .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
    );
    pdf.push(Break::new(1));
    pdf.push(build_table(document).map_err(RenderError::Build)?);

    let mut bytes = Vec::new();
    pdf.render(&mut bytes).map_err(RenderError::Build)?;
    Ok(bytes)
}

/// Renders the invoice and writes it to `path`, replacing any existing file.
pub fn render_to_file(
    path: impl AsRef<Path>,
    document: &InvoiceDocument,
    fonts: &mut FontLoader,
) -> Result<RenderedInvoice, RenderError> {
    let path = path.as_ref();
    let bytes = render_to_bytes(document, fonts)?;

    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, &bytes).map_err(io_error)?;

    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(RenderedInvoice {
        path: path.to_path_buf(),
        size: bytes.len(),
    })
}
