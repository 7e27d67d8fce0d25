use crate::layout::{MeasureContext, Run, Size};
use crate::richtext::{escape_html, parse_inline_html};

use super::{text_height, Drawable, LineBreak};

/// Content nested inside an HTML fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum HtmlNode {
    Text(String),
    Element(Html),
}

/// An HTML element with text and nested elements.
///
/// Fragments are flattened into styled runs: `b`/`strong`, `i`/`em`, `u`,
/// colored `span`/`font` and `br` are honored, other tags only group content.
#[derive(Clone, Debug, PartialEq)]
pub struct Html {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<HtmlNode>,
    style: String,
}

impl Html {
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            children: Vec::new(),
            style: String::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Base style of the flattened text; empty means the document default.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn add_text(&mut self, text: &str) {
        if let Some(HtmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(HtmlNode::Text(text.to_string()));
        }
    }

    pub fn add_element(&mut self, element: Html) {
        self.children.push(HtmlNode::Element(element));
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.add_text(text);
        self
    }

    pub fn with_element(mut self, element: Html) -> Self {
        self.add_element(element);
        self
    }

    /// Serializes the fragment with escaped text and attribute values.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        self.write_markup(&mut markup);
        markup
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        if is_void(&self.tag) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                HtmlNode::Text(text) => out.push_str(&escape_html(text)),
                HtmlNode::Element(element) => element.write_markup(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    /// Plain text content without any markup.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                HtmlNode::Text(value) => text.push_str(value),
                HtmlNode::Element(element) if element.tag.eq_ignore_ascii_case("br") => {
                    text.push('\n')
                }
                HtmlNode::Element(element) => text.push_str(&element.plain_text()),
            }
        }
        text
    }

    pub fn runs(&self, cx: &MeasureContext<'_>) -> Vec<Run> {
        let base = cx.text_style(&self.style, None);
        match parse_inline_html(&self.to_markup()) {
            Ok(spans) => spans
                .iter()
                .map(|span| Run::new(span.text(), span.apply(&base)))
                .collect(),
            Err(err) => {
                log::warn!("HTML fragment <{}> flattened to plain text: {err}", self.tag);
                vec![Run::new(self.plain_text(), base)]
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    ["br", "hr", "img", "meta", "wbr"]
        .iter()
        .any(|void| tag.eq_ignore_ascii_case(void))
}

impl Drawable for Html {
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size {
        Size::new(available_width, text_height(cx, &self.runs(cx), available_width))
    }

    fn line_break(&self) -> LineBreak {
        LineBreak::NextLine
    }
}
