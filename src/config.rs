//! Run configuration.

use std::path::{Path, PathBuf};

use crate::fonts::FontSource;

/// Default CSV location, relative to the working directory.
pub const DEFAULT_INPUT: &str = "data/products.csv";

/// Default PDF location, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "output/invoice.pdf";

/// Inputs for one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceConfig {
    input: PathBuf,
    output: PathBuf,
    font: FontSource,
    open_viewer: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            font: FontSource::System,
            open_viewer: true,
        }
    }
}

impl InvoiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Whether the finished PDF is opened in the default viewer.
    pub fn with_open_viewer(mut self, open_viewer: bool) -> Self {
        self.open_viewer = open_viewer;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn font(&self) -> &FontSource {
        &self.font
    }

    pub fn open_viewer(&self) -> bool {
        self.open_viewer
    }
}
