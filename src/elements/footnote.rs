use crate::layout::{MeasureContext, Run, Size};

use super::{Drawable, LineBreak};

/// Relative size of the inline reference number.
pub const MARKER_SCALE: f64 = 0.7;

/// A note whose number appears inline and whose text is collected at the
/// end of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct Footnote {
    pub style: String,
    pub text: String,
}

impl Footnote {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            text: String::new(),
        }
    }

    pub fn add_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// The reference number as a small run. Registers the note on first use.
    pub fn marker_runs(&self, cx: &MeasureContext<'_>) -> Vec<Run> {
        let number = cx.footnote_number(self);
        let style = cx.text_style(&self.style, None).scaled(MARKER_SCALE);
        vec![Run::new(number.to_string(), style)]
    }
}

impl Drawable for Footnote {
    fn footprint(&self, cx: &MeasureContext<'_>, _available_width: f64) -> Size {
        let runs = self.marker_runs(cx);
        let width = runs
            .iter()
            .map(|run| cx.metrics().text_width(&run.text, &run.style))
            .sum();
        let height = runs
            .iter()
            .map(|run| cx.metrics().line_height(&run.style))
            .fold(0.0, f64::max);
        Size::new(width, height)
    }

    fn line_break(&self) -> LineBreak {
        LineBreak::SameLine
    }
}
