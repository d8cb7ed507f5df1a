//! The end-to-end run: check input, register the font, read, normalize, render, open.
//!
//! Progress and diagnostics go to the writers passed in, which the binary wires to stdout and
//! stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::config::InvoiceConfig;
use crate::fonts::{FontLoader, FONT_NAME};
use crate::ingest::{self, IngestError};
use crate::model::InvoiceDocument;
use crate::normalize;
use crate::render::{self, RenderError};
use crate::viewer::Viewer;

/// Fatal errors for a run. Every variant maps to exit code 1.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("no data for the invoice")]
    NoData,
    #[error("PDF creation failed: {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("failed to write progress output")]
    Output(#[from] io::Error),
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub line_items: usize,
    pub skipped_blank: usize,
    pub skipped_malformed: usize,
    pub bytes_written: usize,
}

/// Runs the whole pipeline for `config`.
pub fn run<O, E>(
    config: &InvoiceConfig,
    fonts: &mut FontLoader,
    viewer: &dyn Viewer,
    out: &mut O,
    err: &mut E,
) -> Result<RunSummary, InvoiceError>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let input = config.input();
    if !input.is_file() {
        return Err(IngestError::NotFound {
            path: input.to_path_buf(),
        }
        .into());
    }

    if !fonts.ensure_registered() {
        writeln!(
            err,
            "Warning: font '{}' could not be loaded; Cyrillic text may not render correctly.",
            FONT_NAME
        )?;
    }

    let rows = ingest::load_rows(input)?;
    let report = normalize::collect_line_items(&rows, out, err)?;
    if report.items.is_empty() {
        return Err(InvoiceError::NoData);
    }

    let line_items = report.items.len();
    let document = InvoiceDocument::new(report.items);
    let output = config.output();
    let rendered = render::render_to_file(output, &document, fonts).map_err(|source| {
        InvoiceError::Render {
            path: output.to_path_buf(),
            source,
        }
    })?;
    writeln!(out, "Done: {}", rendered.path.display())?;

    if config.open_viewer() && rendered.path.is_file() {
        writeln!(out, "Opening PDF...")?;
        match viewer.open(&rendered.path) {
            Ok(()) => debug!("Viewer launched for {}", rendered.path.display()),
            Err(launch_err) => warn!("Could not open {}: {}", rendered.path.display(), launch_err),
        }
    }

    Ok(RunSummary {
        output: rendered.path,
        line_items,
        skipped_blank: report.skipped_blank,
        skipped_malformed: report.skipped_malformed,
        bytes_written: rendered.size,
    })
}
