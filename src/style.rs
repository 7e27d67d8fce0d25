//! Named text styles and the table drawable elements resolve them from.

use std::collections::HashMap;

/// An sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Parses `#RRGGBB` or `RRGGBB`. Empty or malformed input yields `None`.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Weight and decoration flags of a style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontStyle {
    /// Parses the report-definition flag string (`"B"`, `"BI"`, `"U"`...).
    pub fn parse(flags: &str) -> Self {
        let mut style = FontStyle::default();
        for flag in flags.chars() {
            match flag.to_ascii_uppercase() {
                'B' => style.bold = true,
                'I' => style.italic = true,
                'U' => style.underline = true,
                _ => {}
            }
        }
        style
    }
}

/// A named bundle of typographic attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    name: String,
    font: String,
    size: f64,
    color: Option<Rgb>,
    font_style: FontStyle,
}

impl Style {
    /// Creates a style using the default report font at 12pt.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            font: crate::document::DEFAULT_FONT.to_string(),
            size: crate::document::DEFAULT_FONT_SIZE,
            color: None,
            font_style: FontStyle::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    /// Sets the font family and returns the updated style.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Sets the size in points and returns the updated style.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Sets the text color and returns the updated style.
    pub fn with_color(mut self, color: impl Into<Option<Rgb>>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the weight/decoration flags and returns the updated style.
    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }

    /// Concrete text attributes, with `color` taking precedence over the style color.
    pub fn text_style(&self, color: Option<Rgb>) -> TextStyle {
        TextStyle {
            font: self.font.clone(),
            size: self.size,
            bold: self.font_style.bold,
            italic: self.font_style.italic,
            underline: self.font_style.underline,
            color: color.or(self.color),
        }
    }
}

/// Resolved attributes of one run of text, as handed to the emitters.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Rgb>,
}

impl TextStyle {
    /// Returns a copy scaled to `factor` of the current size.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            ..self.clone()
        }
    }
}

/// What [`StyleTable::get`] does when the requested name is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleFallback {
    /// Return the first style that was ever added. Report definitions rely on
    /// this when they reference styles they never declared.
    #[default]
    FirstInserted,
    /// Return `None` for unknown names.
    Strict,
}

/// Styles keyed by name.
///
/// Re-adding a name replaces the attributes in place, so the first-inserted
/// slot stays stable across upserts.
#[derive(Clone, Debug, Default)]
pub struct StyleTable {
    styles: Vec<Style>,
    index: HashMap<String, usize>,
    fallback: StyleFallback,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with the given miss behavior.
    pub fn with_fallback(fallback: StyleFallback) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Inserts the style or replaces the one with the same name.
    pub fn add(&mut self, style: Style) {
        match self.index.get(style.name()) {
            Some(&slot) => self.styles[slot] = style,
            None => {
                self.index.insert(style.name().to_string(), self.styles.len());
                self.styles.push(style);
            }
        }
    }

    /// Looks a style up by name.
    ///
    /// A miss returns the first-inserted style unless the table is strict.
    /// Only an empty table (or a strict miss) yields `None`.
    pub fn get(&self, name: &str) -> Option<&Style> {
        if let Some(style) = self.get_exact(name) {
            return Some(style);
        }
        match self.fallback {
            StyleFallback::FirstInserted => {
                let first = self.styles.first();
                if let Some(first) = first {
                    log::debug!("style {name:?} not defined, using {:?}", first.name());
                }
                first
            }
            StyleFallback::Strict => None,
        }
    }

    /// Looks a style up by name without any fallback.
    pub fn get_exact(&self, name: &str) -> Option<&Style> {
        self.index.get(name).map(|&slot| &self.styles[slot])
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Styles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }
}
