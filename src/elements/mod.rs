//! Drawable primitives created by a report definition.
//!
//! Elements are plain data: they carry geometry, a style name and content,
//! and know how large they are for a given available width. Placement onto
//! pages happens later in [`crate::layout`], which both output backends share.

mod cell;
mod footnote;
mod html;
mod image;
mod line;
mod page_header;
mod text;

pub use cell::{Cell, CELL_PADDING};
pub use footnote::Footnote;
pub use html::{Html, HtmlNode};
pub use image::{Image, ImageCache, ImageSource, LoadedImage};
pub use line::Line;
pub use page_header::PageHeader;
pub use text::{InlineElement, Text, TextBox, TEXT_BOX_PADDING};

use crate::layout::{MeasureContext, Run, Size};

/// Where the cursor goes once an element has been placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineBreak {
    /// Continue to the right of the element.
    SameLine,
    /// Continue at the left edge below the current line.
    #[default]
    NextLine,
    /// Leave the cursor untouched; the element was positioned on its own.
    Explicit,
}

impl LineBreak {
    /// Maps the numeric cell code: `0` stays on the line, anything else breaks.
    pub fn from_cell_code(code: i32) -> Self {
        if code == 0 {
            LineBreak::SameLine
        } else {
            LineBreak::NextLine
        }
    }

    /// Maps the image code: `T` stays on the line, `N` breaks, anything else
    /// leaves the cursor alone.
    pub fn from_image_code(code: &str) -> Self {
        match code.trim() {
            "T" | "t" => LineBreak::SameLine,
            "N" | "n" => LineBreak::NextLine,
            _ => LineBreak::Explicit,
        }
    }
}

/// Horizontal alignment of text within a cell, or of an image on the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    /// Parses `L`, `C`, `R` or `J`. Returns `None` for anything else,
    /// including the empty string used for "position by coordinates".
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Some(Align::Left),
            "C" | "CENTER" => Some(Align::Center),
            "R" | "RIGHT" => Some(Align::Right),
            "J" | "JUSTIFY" => Some(Align::Justify),
            _ => None,
        }
    }
}

/// Which sides of a box get a border stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Border {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Border {
    pub const NONE: Border = Border {
        left: false,
        top: false,
        right: false,
        bottom: false,
    };

    pub const ALL: Border = Border {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };

    /// Parses `1`/`0` or any combination of `L`, `T`, `R`, `B`.
    pub fn parse(sides: &str) -> Self {
        let sides = sides.trim();
        match sides {
            "1" => return Border::ALL,
            "" | "0" => return Border::NONE,
            _ => {}
        }
        let mut border = Border::NONE;
        for side in sides.chars() {
            match side.to_ascii_uppercase() {
                'L' => border.left = true,
                'T' => border.top = true,
                'R' => border.right = true,
                'B' => border.bottom = true,
                _ => {}
            }
        }
        border
    }

    pub fn is_visible(self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

impl From<bool> for Border {
    fn from(all: bool) -> Self {
        if all {
            Border::ALL
        } else {
            Border::NONE
        }
    }
}

/// Measuring contract shared by every drawable.
pub trait Drawable {
    /// Space the element occupies when `available_width` remains on the line.
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size;

    /// Cursor movement after placement.
    fn line_break(&self) -> LineBreak;
}

/// A primitive in the document's element stream.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawableElement {
    Cell(Cell),
    TextBox(TextBox),
    Text(Text),
    Html(Html),
    Line(Line),
    Image(Image),
    Footnote(Footnote),
}

impl DrawableElement {
    fn as_drawable(&self) -> &dyn Drawable {
        match self {
            DrawableElement::Cell(element) => element,
            DrawableElement::TextBox(element) => element,
            DrawableElement::Text(element) => element,
            DrawableElement::Html(element) => element,
            DrawableElement::Line(element) => element,
            DrawableElement::Image(element) => element,
            DrawableElement::Footnote(element) => element,
        }
    }

    /// Image source of the element, if it is an image.
    pub fn image_source(&self) -> Option<&ImageSource> {
        match self {
            DrawableElement::Image(image) => Some(image.source()),
            _ => None,
        }
    }
}

impl Drawable for DrawableElement {
    fn footprint(&self, cx: &MeasureContext<'_>, available_width: f64) -> Size {
        self.as_drawable().footprint(cx, available_width)
    }

    fn line_break(&self) -> LineBreak {
        self.as_drawable().line_break()
    }
}

macro_rules! impl_from_element {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for DrawableElement {
                fn from(element: $variant) -> Self {
                    DrawableElement::$variant(element)
                }
            }
        )*
    };
}

impl_from_element!(Cell, TextBox, Text, Html, Line, Image, Footnote);

/// Height of a block of text composed from `runs` within `width`.
pub(crate) fn text_height(cx: &MeasureContext<'_>, runs: &[Run], width: f64) -> f64 {
    cx.compose(runs, width).iter().map(|line| line.height).sum()
}
