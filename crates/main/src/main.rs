use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use csv_invoice::config::{InvoiceConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
use csv_invoice::fonts::{FontLoader, FontSource};
use csv_invoice::pipeline;
use csv_invoice::viewer::SystemViewer;

/// Renders a PDF invoice from a CSV with `product`, `price` and `qty` columns.
///
/// The Cyrillic-capable font is read from `%WINDIR%\Fonts\arial.ttf` unless `--font` or
/// `INVOICE_FONT_PATH` points at another TrueType file.
#[derive(Parser)]
#[command(author, version, about = "Render a PDF invoice from a CSV of line items")]
struct Cli {
    /// CSV file to read.
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// PDF file to write; overwritten if it exists.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TrueType font to use instead of the system Arial.
    #[arg(long, env = "INVOICE_FONT_PATH")]
    font: Option<PathBuf>,

    /// Do not open the PDF after writing it.
    #[arg(long)]
    no_open: bool,
}

impl Cli {
    fn config(self) -> InvoiceConfig {
        let font = self.font.map_or(FontSource::System, FontSource::File);
        InvoiceConfig::new()
            .with_input(self.input)
            .with_output(self.output)
            .with_font(font)
            .with_open_viewer(!self.no_open)
    }
}

fn main() {
    env_logger::init();
    let config = Cli::parse().config();
    let mut fonts = FontLoader::new(config.font().clone());

    let result = pipeline::run(
        &config,
        &mut fonts,
        &SystemViewer,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    match result {
        Ok(summary) => log::debug!("{:?}", summary),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
