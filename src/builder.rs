//! Document construction helpers.

use genpdf::{self, Margins, PaperSize, SimplePageDecorator, Size};

use crate::elements::mm_from_f64;
use crate::fonts::FontHandle;

const DEFAULT_MARGIN_MM: f64 = 20.0;
const DEFAULT_FONT_SIZE: u8 = 10;

/// Builder for `genpdf::Document` instances pre-configured for invoices.
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    font_size: Option<u8>,
    title: Option<String>,
}

impl DocumentBuilder {
    /// Creates a builder with no settings applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// A4 paper, 20 mm margins on every side and a 10 pt base font.
    pub fn invoice() -> Self {
        let margin = mm_from_f64(DEFAULT_MARGIN_MM);
        Self::new()
            .with_paper_size(PaperSize::A4)
            .with_margins(Margins::trbl(margin, margin, margin, margin))
            .with_font_size(DEFAULT_FONT_SIZE)
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the page margins.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the default font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the PDF metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builds a document using the registered font as its default family.
    pub fn build(self, font: &FontHandle) -> genpdf::Document {
        let mut document = genpdf::Document::new(font.family());

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let mut decorator = SimplePageDecorator::new();
        if let Some(margins) = self.margins {
            decorator.set_margins(margins);
        }
        document.set_page_decorator(decorator);

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_defaults() {
        let builder = DocumentBuilder::invoice().with_title("Invoice");
        assert_eq!(builder.paper_size, Some(Size::from(PaperSize::A4)));
        assert_eq!(builder.font_size, Some(DEFAULT_FONT_SIZE));
        let margin = mm_from_f64(DEFAULT_MARGIN_MM);
        assert_eq!(
            builder.margins,
            Some(Margins::trbl(margin, margin, margin, margin))
        );
        assert_eq!(builder.title.as_deref(), Some("Invoice"));
    }

    #[test]
    fn margins_override_the_preset() {
        let builder = DocumentBuilder::invoice().with_margins(Margins::all(mm_from_f64(10.0)));
        assert_eq!(builder.margins, Some(Margins::all(mm_from_f64(10.0))));
    }
}
