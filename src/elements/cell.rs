use crate::layout::{MeasureContext, Run, Size};
use crate::style::Rgb;

use super::{text_height, Align, Border, Drawable, LineBreak};

/// Horizontal inset between a cell's edge and its text.
pub const CELL_PADDING: f64 = 1.0;

/// A rectangular box with a single block of text.
///
/// A zero `width` extends the cell to the right content edge; a zero `height`
/// grows the cell to fit its wrapped text.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub width: f64,
    pub height: f64,
    pub border: Border,
    pub align: Align,
    pub background: Option<Rgb>,
    pub style: String,
    pub line_break: LineBreak,
    /// Offset from the top of the current region, `None` to use the cursor.
    pub top: Option<f64>,
    /// Offset from the left content edge, `None` to use the cursor.
    pub left: Option<f64>,
    pub fill: bool,
    /// Non-zero shrinks the text onto a single line instead of wrapping.
    pub stretch: u8,
    pub border_color: Option<Rgb>,
    pub text_color: Option<Rgb>,
    /// Start a fresh line height measurement from this cell.
    pub reset_height: bool,
    pub text: String,
}

impl Cell {
    pub fn new(width: f64, height: f64, style: impl Into<String>) -> Self {
        Self {
            width,
            height,
            border: Border::NONE,
            align: Align::Left,
            background: None,
            style: style.into(),
            line_break: LineBreak::SameLine,
            top: None,
            left: None,
            fill: false,
            stretch: 0,
            border_color: None,
            text_color: None,
            reset_height: false,
            text: String::new(),
        }
    }

    /// Appends character data.
    pub fn add_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_border(mut self, border: impl Into<Border>) -> Self {
        self.border = border.into();
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Sets a background color; it is only painted when `fill` is set.
    pub fn with_background(mut self, color: impl Into<Option<Rgb>>, fill: bool) -> Self {
        self.background = color.into();
        self.fill = fill;
        self
    }

    pub fn with_line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    /// Pins the cell to explicit coordinates instead of the cursor.
    pub fn with_position(mut self, left: Option<f64>, top: Option<f64>) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_stretch(mut self, stretch: u8) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_colors(mut self, border: Option<Rgb>, text: Option<Rgb>) -> Self {
        self.border_color = border;
        self.text_color = text;
        self
    }

    pub fn with_reset_height(mut self, reset_height: bool) -> Self {
        self.reset_height = reset_height;
        self
    }

    /// Width the cell takes when `available_width` remains on the line.
    pub fn resolved_width(&self, available_width: f64) -> f64 {
        if self.width > 0.0 {
            self.width
        } else {
            available_width.max(0.0)
        }
    }

    /// Text runs inside the cell. Stretched cells get a font scaled so the
    /// text fits on one line.
    pub fn runs(&self, cx: &MeasureContext<'_>, width: f64) -> Vec<Run> {
        if self.text.is_empty() {
            return Vec::new();
        }
        let mut style = cx.text_style(&self.style, self.text_color);
        if self.stretch > 0 {
            let natural = cx.metrics().text_width(&self.text, &style);
            let inner = (width - 2.0 * CELL_PADDING).max(1.0);
            if natural > inner {
                style = style.scaled(inner / natural);
            }
        }
        vec![Run::new(self.text.clone(), style)]
    }
}

impl Drawable for Cell {
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size {
        let width = self.resolved_width(available_width);
        let runs = self.runs(cx, width);
        let content = if runs.is_empty() {
            cx.metrics()
                .line_height(&cx.text_style(&self.style, self.text_color))
        } else {
            text_height(cx, &runs, width - 2.0 * CELL_PADDING)
        };
        Size::new(width, self.height.max(content))
    }

    fn line_break(&self) -> LineBreak {
        self.line_break
    }
}
