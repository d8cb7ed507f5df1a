//! Table building blocks on top of `genpdf` primitives.
//!
//! `genpdf` ships a frame decorator that always draws black lines; invoices use a lighter grey
//! grid, so this module provides its own [`CellDecorator`] along with padded cell helpers and a
//! shaded header cell.

use genpdf::elements::{CellDecorator, PaddedElement, Paragraph, StyledElement};
use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Context, Element, Margins, Mm, Position, RenderResult};

const CELL_PADDING_HORIZONTAL_MM: f64 = 3.5;
const CELL_PADDING_VERTICAL_MM: f64 = 2.8;

/// Stroke width `genpdf` uses for lines (1 pt).
const STROKE_WIDTH_MM: f64 = 0.3528;
/// Distance between fill strokes; smaller than the stroke so the strokes overlap.
const FILL_STEP_MM: f64 = 0.3;

/// Grey used for grid lines.
pub const GRID_COLOR: Color = Color::Rgb(128, 128, 128);

/// Light grey (#f2f2f2) behind the header row.
pub const HEADER_FILL: Color = Color::Rgb(242, 242, 242);

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Padding applied inside every table cell.
pub fn cell_padding() -> Margins {
    let vertical = mm_from_f64(CELL_PADDING_VERTICAL_MM);
    let horizontal = mm_from_f64(CELL_PADDING_HORIZONTAL_MM);
    Margins::trbl(vertical, horizontal, vertical, horizontal)
}

/// A padded table cell holding `text` in the given style.
pub fn cell(text: impl Into<String>, style: Style) -> PaddedElement<StyledElement<Paragraph>> {
    Paragraph::new(text.into())
        .styled(style)
        .padded(cell_padding())
}

/// Bold header cell on a light grey background.
pub fn header_cell(text: impl Into<String>) -> ShadedCell {
    ShadedCell::new(text, Style::new().bold(), HEADER_FILL)
}

/// A single-line cell whose background is filled before its text is drawn.
///
/// `genpdf` has no fill primitive, so the background is painted as a stack of overlapping
/// horizontal strokes covering the padded line box.
pub struct ShadedCell {
    inner: PaddedElement<StyledElement<Paragraph>>,
    text_style: Style,
    fill: Style,
}

impl ShadedCell {
    pub fn new(text: impl Into<String>, text_style: Style, fill: Color) -> Self {
        Self {
            inner: cell(text, text_style),
            text_style,
            fill: Style::new().with_color(fill),
        }
    }

    /// Height of the shaded box for text with the given line height.
    pub fn fill_height(line_height: Mm) -> Mm {
        line_height + mm_from_f64(2.0 * CELL_PADDING_VERTICAL_MM)
    }
}

impl Element for ShadedCell {
    fn render(
        &mut self,
        context: &Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let line_height = style.and(self.text_style).line_height(&context.font_cache);
        let height: f64 = Self::fill_height(line_height).into();
        let width = area.size().width;

        for offset in fill_offsets(height) {
            let y = mm_from_f64(offset);
            area.draw_line(
                vec![Position::new(Mm::default(), y), Position::new(width, y)],
                self.fill,
            );
        }

        self.inner.render(context, area, style)
    }
}

/// Vertical centres of the strokes that cover `0..height` without crossing either edge.
pub(crate) fn fill_offsets(height: f64) -> Vec<f64> {
    let half = STROKE_WIDTH_MM / 2.0;
    let last = height - half;
    if last < half {
        return Vec::new();
    }

    let mut offsets = Vec::new();
    let mut offset = half;
    while offset < last {
        offsets.push(offset);
        offset += FILL_STEP_MM;
    }
    offsets.push(last);
    offsets
}

/// Draws a full grid: every cell gets all four borders.
#[derive(Clone, Debug)]
pub struct GridCellDecorator {
    style: Style,
}

impl GridCellDecorator {
    /// Creates a decorator drawing lines in `color`.
    pub fn new(color: Color) -> Self {
        Self {
            style: Style::new().with_color(color),
        }
    }
}

impl Default for GridCellDecorator {
    fn default() -> Self {
        Self::new(GRID_COLOR)
    }
}

impl CellDecorator for GridCellDecorator {
    fn decorate_cell(
        &mut self,
        _column: usize,
        _row: usize,
        _has_more: bool,
        area: render::Area<'_>,
        _style: Style,
    ) {
        let size = area.size();
        area.draw_line(
            vec![
                Position::default(),
                Position::new(size.width, 0),
                Position::new(size.width, size.height),
                Position::new(0, size.height),
                Position::default(),
            ],
            self.style,
        );
    }
}
