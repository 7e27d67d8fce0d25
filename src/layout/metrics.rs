//! Text measurement used by layout.
//!
//! Both emitters share one set of metrics so an HTML page and a PDF page
//! break at the same places. Widths come from the Helvetica AFM tables; the
//! bundled sans-serif fonts are close enough in advance width for wrapping.

use crate::style::TextStyle;

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f64 = 1.2;

/// Advance width used for characters outside the table, in 1/1000 em.
const DEFAULT_WIDTH: u16 = 556;

/// Printable ASCII (0x20..=0x7e), Helvetica regular.
const REGULAR_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Printable ASCII (0x20..=0x7e), Helvetica bold.
const BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Measures text for layout.
pub trait TextMetrics {
    /// Advance width of `text` in points.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64;

    /// Distance between consecutive baselines in points.
    fn line_height(&self, style: &TextStyle) -> f64;
}

/// Helvetica-class metrics.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardMetrics;

impl StandardMetrics {
    fn char_width(c: char, bold: bool) -> u16 {
        let table = if bold { &BOLD_WIDTHS } else { &REGULAR_WIDTHS };
        match c {
            ' '..='~' => table[c as usize - 0x20],
            '\u{2014}' | '\u{2026}' | '\u{2122}' => 1000,
            '\u{2018}' | '\u{2019}' => 222,
            _ => DEFAULT_WIDTH,
        }
    }
}

impl TextMetrics for StandardMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(Self::char_width(c, style.bold)))
            .sum();
        f64::from(units) * style.size / 1000.0
    }

    fn line_height(&self, style: &TextStyle) -> f64 {
        style.size * LINE_SPACING
    }
}
