//! Inline rich text: styled spans and the HTML subset they are parsed from.
//!
//! HTML fragments in a report are flattened into [`Span`]s before layout so
//! both emitters see the same runs. The parser understands the inline tags
//! report templates use for emphasis:
//!
//! - `<b>`/`<strong>` for bold, `<i>`/`<em>` for italic, `<u>` for underline
//! - `<font color="#RRGGBB">` and `<span style="color: #RRGGBB">` for color
//! - `<br>` for a hard line break
//!
//! Any other element only groups its content. Character references such as
//! `&amp;` and `&#233;` are decoded.

use std::borrow::Cow;
use std::fmt;

use crate::style::{parse_hex_color, Rgb, TextStyle};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<Rgb>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    /// Layers the span's attributes over `base`. Flags only ever add emphasis.
    pub fn apply(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            bold: base.bold || self.bold,
            italic: base.italic || self.italic,
            underline: base.underline || self.underline,
            color: self.color.or(base.color),
            ..base.clone()
        }
    }
}

/// Parse errors produced by [`parse_inline_html`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<Rgb>,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            color: self.color,
        }
    }

    fn enter(mut self, tag: &Tag<'_>) -> Self {
        match tag.name.as_str() {
            "b" | "strong" => self.bold = true,
            "i" | "em" => self.italic = true,
            "u" => self.underline = true,
            _ => {}
        }
        if let Some(color) = tag.color() {
            self.color = Some(color);
        }
        self
    }
}

const VOID_TAGS: [&str; 5] = ["br", "hr", "img", "meta", "wbr"];

/// An opening tag.
struct Tag<'a> {
    name: String,
    attributes: Vec<(&'a str, String)>,
    self_closing: bool,
}

impl Tag<'_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Color from a `color` attribute or a `color:` declaration in `style`.
    fn color(&self) -> Option<Rgb> {
        if let Some(color) = self.attribute("color").and_then(parse_hex_color) {
            return Some(color);
        }
        self.attribute("style")?
            .split(';')
            .filter_map(|declaration| declaration.split_once(':'))
            .find(|(property, _)| property.trim().eq_ignore_ascii_case("color"))
            .and_then(|(_, value)| parse_hex_color(value))
    }

    fn is_void(&self) -> bool {
        self.self_closing || VOID_TAGS.contains(&self.name.as_str())
    }
}

/// Parses an inline HTML fragment into a list of [`Span`]s.
///
/// Mismatched or unterminated elements are reported with their byte offset.
pub fn parse_inline_html(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, idx) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(idx, input.len());
    Ok(spans)
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_tag: Option<&str>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or_else(|| ParseError::new(index, "unterminated comment"))?;
            index += end + 3;
            continue;
        }

        if rest.starts_with("</") {
            let end = rest
                .find('>')
                .ok_or_else(|| ParseError::new(index, "unterminated closing tag"))?;
            let name = rest[2..end].trim().to_ascii_lowercase();
            return match closing_tag {
                Some(open) if open == name => {
                    flush_buffer(&mut buffer, &mut spans, state);
                    Ok((spans, index + end + 1))
                }
                Some(open) => Err(ParseError::new(
                    index,
                    format!("expected `</{open}>`, found `</{name}>`"),
                )),
                None => Err(ParseError::new(
                    index,
                    format!("unexpected closing tag `</{name}>`"),
                )),
            };
        }

        if rest.starts_with('<') {
            let (tag, after) = parse_tag(input, index)?;
            flush_buffer(&mut buffer, &mut spans, state);
            index = after;
            if tag.name == "br" {
                spans.push(state.to_span("\n"));
            }
            if tag.is_void() {
                continue;
            }
            let nested_state = state.enter(&tag);
            let (nested, new_index) =
                parse_inner(input, index, nested_state, Some(tag.name.as_str()))?;
            spans.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with('&') {
            if let Some((decoded, len)) = decode_entity(rest) {
                buffer.push(decoded);
                index += len;
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        buffer.push(ch);
        index += ch.len_utf8();
    }

    if let Some(tag) = closing_tag {
        Err(ParseError::new(index, format!("unterminated `<{tag}>` element")))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}

/// Parses the opening tag starting at `index`, returning it and the index
/// just past its `>`.
fn parse_tag(input: &str, index: usize) -> Result<(Tag<'_>, usize), ParseError> {
    let rest = &input[index + 1..];
    let end = find_tag_end(rest).ok_or_else(|| ParseError::new(index, "unterminated tag"))?;
    let mut body = rest[..end].trim();
    let self_closing = body.ends_with('/');
    if self_closing {
        body = body[..body.len() - 1].trim_end();
    }

    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::new(index, format!("invalid tag name `{name}`")));
    }

    let tag = Tag {
        name,
        attributes: parse_attributes(&body[name_end..]),
        self_closing,
    };
    Ok((tag, index + 1 + end + 1))
}

/// Position of the `>` closing a tag, skipping quoted attribute values.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (pos, c) in rest.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if open == c => quote = None,
            (None, '>') => return Some(pos),
            _ => {}
        }
    }
    None
}

fn parse_attributes(mut source: &str) -> Vec<(&str, String)> {
    let mut attributes = Vec::new();
    loop {
        source = source.trim_start();
        if source.is_empty() {
            return attributes;
        }
        let name_end = source
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(source.len());
        let name = &source[..name_end];
        source = source[name_end..].trim_start();

        let Some(after_eq) = source.strip_prefix('=') else {
            attributes.push((name, String::new()));
            continue;
        };
        let after_eq = after_eq.trim_start();
        let (raw, remaining) = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &after_eq[1..];
                match inner.find(quote) {
                    Some(close) => (&inner[..close], &inner[close + 1..]),
                    None => (inner, ""),
                }
            }
            _ => {
                let value_end = after_eq
                    .find(char::is_whitespace)
                    .unwrap_or(after_eq.len());
                (&after_eq[..value_end], &after_eq[value_end..])
            }
        };
        attributes.push((name, decode_entities(raw)));
        source = remaining;
    }
}

/// Decodes the character reference at the start of `input`.
fn decode_entity(input: &str) -> Option<(char, usize)> {
    let end = input.char_indices().take(12).find(|(_, c)| *c == ';')?.0;
    let name = &input[1..end];
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, end + 1))
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_entity(rest) {
            Some((decoded, len)) => {
                out.push(decoded);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for HTML content and attribute values.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
