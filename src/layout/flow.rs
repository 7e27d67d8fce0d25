//! Line composition: breaking styled runs into lines of a given width.

use crate::elements::Align;
use crate::style::TextStyle;

use super::metrics::TextMetrics;

/// Slack allowed when comparing a line against its width.
pub(crate) const WRAP_EPSILON: f64 = 0.01;

/// Text sharing one resolved style.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A piece of a composed line. `x` is relative to the line start.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub x: f64,
    pub text: String,
    pub style: TextStyle,
    pub width: f64,
}

/// One composed line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineBox {
    pub fragments: Vec<Fragment>,
    pub width: f64,
    pub height: f64,
}

impl LineBox {
    /// Horizontal offset of the line inside a box of `available` width.
    pub fn offset(&self, available: f64, align: Align) -> f64 {
        let slack = (available - self.width).max(0.0);
        match align {
            Align::Left | Align::Justify => 0.0,
            Align::Center => slack / 2.0,
            Align::Right => slack,
        }
    }

    /// The plain text of the line.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

struct Composer<'m> {
    width: f64,
    metrics: &'m dyn TextMetrics,
    lines: Vec<LineBox>,
    current: LineBox,
    /// The current line was opened by wrapping, so leading blanks are dropped.
    wrapped: bool,
}

impl<'m> Composer<'m> {
    fn push(&mut self, token: &str, style: &TextStyle) {
        if self.wrapped && self.current.fragments.is_empty() && token.trim().is_empty() {
            return;
        }
        let width = self.metrics.text_width(token, style);
        let visible = self.metrics.text_width(token.trim_end(), style);
        if self.current.width + visible > self.width + WRAP_EPSILON
            && !self.current.fragments.is_empty()
        {
            self.finish_line(true);
            if token.trim().is_empty() {
                return;
            }
        }
        if visible > self.width + WRAP_EPSILON {
            self.push_chars(token, style);
            return;
        }
        self.append(token, width, style);
    }

    /// Breaks a word longer than the whole line between characters.
    fn push_chars(&mut self, word: &str, style: &TextStyle) {
        let mut buf = [0u8; 4];
        for c in word.chars() {
            let piece: &str = c.encode_utf8(&mut buf);
            let width = self.metrics.text_width(piece, style);
            if self.current.width + width > self.width + WRAP_EPSILON
                && !self.current.fragments.is_empty()
            {
                if c == ' ' {
                    continue;
                }
                self.finish_line(true);
            }
            self.append(piece, width, style);
        }
    }

    fn append(&mut self, text: &str, width: f64, style: &TextStyle) {
        let height = self.metrics.line_height(style);
        self.current.height = self.current.height.max(height);
        let last = self
            .current
            .fragments
            .last_mut()
            .filter(|last| last.style == *style);
        if let Some(last) = last {
            last.text.push_str(text);
            last.width += width;
        } else {
            self.current.fragments.push(Fragment {
                x: self.current.width,
                text: text.to_string(),
                style: style.clone(),
                width,
            });
        }
        self.current.width += width;
    }

    /// Makes sure an otherwise empty line still takes the height of `style`.
    fn touch(&mut self, style: &TextStyle) {
        let height = self.metrics.line_height(style);
        self.current.height = self.current.height.max(height);
    }

    fn finish_line(&mut self, wrapped: bool) {
        if let Some(last) = self.current.fragments.last_mut() {
            let trimmed = last.text.trim_end().len();
            if trimmed < last.text.len() {
                last.text.truncate(trimmed);
                let width = self.metrics.text_width(&last.text, &last.style);
                self.current.width -= last.width - width;
                last.width = width;
            }
        }
        self.current.fragments.retain(|fragment| !fragment.text.is_empty());
        self.lines.push(std::mem::take(&mut self.current));
        self.wrapped = wrapped;
    }
}

/// Breaks `runs` into lines no wider than `width`.
///
/// Lines break between words, at `\n` and, for words wider than the line,
/// between characters. Adjacent text with the same style is merged.
pub fn compose(runs: &[Run], width: f64, metrics: &dyn TextMetrics) -> Vec<LineBox> {
    let mut composer = Composer {
        width: width.max(0.0),
        metrics,
        lines: Vec::new(),
        current: LineBox::default(),
        wrapped: false,
    };
    let mut touched = false;
    for run in runs {
        for (index, segment) in run.text.split('\n').enumerate() {
            if index > 0 {
                composer.touch(&run.style);
                composer.finish_line(false);
            }
            for token in segment.split_inclusive(' ') {
                composer.push(token, &run.style);
            }
            if !segment.is_empty() || index > 0 {
                touched = true;
            }
        }
    }
    if touched || !composer.current.fragments.is_empty() {
        composer.finish_line(false);
    }
    composer.lines
}
