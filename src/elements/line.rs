use crate::layout::{MeasureContext, Size};
use crate::style::Rgb;

use super::{Drawable, LineBreak};

/// A straight stroke between two points.
///
/// Coordinates are relative to the current region; a missing start point
/// takes the cursor, a missing `x2` runs to the right content edge and a
/// missing `y2` keeps the line horizontal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub color: Option<Rgb>,
}

impl Line {
    pub fn new(x1: Option<f64>, y1: Option<f64>, x2: Option<f64>, y2: Option<f64>) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<Option<Rgb>>) -> Self {
        self.color = color.into();
        self
    }
}

impl Drawable for Line {
    /// Lines never push the cursor, so they take no room in the flow.
    fn footprint(&self, _cx: &MeasureContext<'_>, _available_width: f64) -> Size {
        Size::new(0.0, 0.0)
    }

    fn line_break(&self) -> LineBreak {
        LineBreak::Explicit
    }
}
