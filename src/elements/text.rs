use crate::layout::{MeasureContext, Run, Size};
use crate::style::Rgb;

use super::{text_height, Drawable, Footnote, Html, LineBreak};

/// Inset applied on every side of a padded text box.
pub const TEXT_BOX_PADDING: f64 = 2.0;

/// A run of styled character data.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub style: String,
    pub color: Option<Rgb>,
    pub text: String,
}

impl Text {
    pub fn new(style: impl Into<String>, color: Option<Rgb>) -> Self {
        Self {
            style: style.into(),
            color,
            text: String::new(),
        }
    }

    /// Appends character data; report parsers deliver text in pieces.
    pub fn add_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn runs(&self, cx: &MeasureContext<'_>) -> Vec<Run> {
        if self.text.is_empty() {
            return Vec::new();
        }
        vec![Run::new(
            self.text.clone(),
            cx.text_style(&self.style, self.color),
        )]
    }
}

impl Drawable for Text {
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size {
        Size::new(available_width, text_height(cx, &self.runs(cx), available_width))
    }

    fn line_break(&self) -> LineBreak {
        LineBreak::NextLine
    }
}

/// Content a text box can flow: text, inline HTML and footnote markers.
#[derive(Clone, Debug, PartialEq)]
pub enum InlineElement {
    Text(Text),
    Html(Html),
    Footnote(Footnote),
}

impl InlineElement {
    fn runs(&self, cx: &MeasureContext<'_>) -> Vec<Run> {
        match self {
            InlineElement::Text(text) => text.runs(cx),
            InlineElement::Html(html) => html.runs(cx),
            InlineElement::Footnote(footnote) => footnote.marker_runs(cx),
        }
    }
}

impl From<Text> for InlineElement {
    fn from(text: Text) -> Self {
        InlineElement::Text(text)
    }
}

impl From<Html> for InlineElement {
    fn from(html: Html) -> Self {
        InlineElement::Html(html)
    }
}

impl From<Footnote> for InlineElement {
    fn from(footnote: Footnote) -> Self {
        InlineElement::Footnote(footnote)
    }
}

/// A box whose inline children are wrapped to its width.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
    pub border: bool,
    pub background: Option<Rgb>,
    /// Break the line after the box.
    pub newline: bool,
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Move the box to a new page when it does not fit.
    pub page_check: bool,
    pub style: String,
    pub fill: bool,
    pub padding: bool,
    pub reset_height: bool,
    children: Vec<InlineElement>,
}

impl TextBox {
    pub fn new(width: f64, height: f64, style: impl Into<String>) -> Self {
        Self {
            width,
            height,
            border: false,
            background: None,
            newline: false,
            left: None,
            top: None,
            page_check: true,
            style: style.into(),
            fill: false,
            padding: true,
            reset_height: false,
            children: Vec::new(),
        }
    }

    /// Appends an inline child.
    pub fn add_element(&mut self, element: impl Into<InlineElement>) {
        self.children.push(element.into());
    }

    pub fn with_element(mut self, element: impl Into<InlineElement>) -> Self {
        self.add_element(element);
        self
    }

    pub fn children(&self) -> &[InlineElement] {
        &self.children
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn with_background(mut self, color: impl Into<Option<Rgb>>, fill: bool) -> Self {
        self.background = color.into();
        self.fill = fill;
        self
    }

    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    pub fn with_position(mut self, left: Option<f64>, top: Option<f64>) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_page_check(mut self, page_check: bool) -> Self {
        self.page_check = page_check;
        self
    }

    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_reset_height(mut self, reset_height: bool) -> Self {
        self.reset_height = reset_height;
        self
    }

    pub fn inset(&self) -> f64 {
        if self.padding {
            TEXT_BOX_PADDING
        } else {
            0.0
        }
    }

    pub fn resolved_width(&self, available_width: f64) -> f64 {
        if self.width > 0.0 {
            self.width
        } else {
            available_width.max(0.0)
        }
    }

    /// All inline runs in child order.
    pub fn runs(&self, cx: &MeasureContext<'_>) -> Vec<Run> {
        self.children
            .iter()
            .flat_map(|child| child.runs(cx))
            .collect()
    }
}

impl Drawable for TextBox {
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size {
        let width = self.resolved_width(available_width);
        let inner = width - 2.0 * self.inset();
        let content = text_height(cx, &self.runs(cx), inner) + 2.0 * self.inset();
        Size::new(width, self.height.max(content))
    }

    fn line_break(&self) -> LineBreak {
        if self.newline {
            LineBreak::NextLine
        } else {
            LineBreak::SameLine
        }
    }
}
