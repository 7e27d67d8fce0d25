//! Backend-agnostic page layout.
//!
//! [`LayoutEngine`] walks the document's element stream with a cursor,
//! wraps text with [`TextMetrics`], breaks pages and produces a list of
//! [`PageLayout`]s holding absolutely positioned items. The HTML and PDF
//! emitters only paint those items.
//!
//! Coordinates are points from the top-left corner of the page. Explicit
//! element coordinates are offsets from the left content edge and from the
//! top of the region (header, page header, body or footer) being laid out.

mod flow;
mod metrics;

pub use flow::{compose, Fragment, LineBox, Run};
pub use metrics::{StandardMetrics, TextMetrics, LINE_SPACING};

use std::cell::RefCell;

use crate::document::{ProcessingPhase, ReportDocument};
use crate::elements::{
    Align, Border, Cell, Drawable, DrawableElement, Footnote, Image, ImageCache, ImageSource,
    Line, LineBreak, TextBox, CELL_PADDING,
};
use crate::style::{Rgb, StyleTable, TextStyle};

use flow::WRAP_EPSILON;

/// Placeholder replaced by the current page number.
pub const PAGE_NUMBER: &str = "{PAGENUM}";
/// Placeholder replaced by the total number of pages.
pub const PAGE_TOTAL: &str = "{PAGETOTAL}";

/// Size of the "Generated by" line relative to the default font.
const GENERATED_BY_SCALE: f64 = 0.75;

/// Gap between the body and the collated footnotes.
const FOOTNOTE_GAP: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// What a placed item paints.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacedContent {
    /// A single-line text fragment whose top-left corner is the rect origin.
    Text { text: String, style: TextStyle },
    /// Borders and background of a cell or text box.
    Frame {
        border: Border,
        border_color: Option<Rgb>,
        fill: Option<Rgb>,
    },
    /// A stroke in absolute page coordinates; the rect is its bounding box.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Option<Rgb>,
    },
    /// An image scaled into the rect.
    Image { source: ImageSource },
}

/// An item with its final position.
#[derive(Clone, Debug, PartialEq)]
pub struct Placed {
    pub rect: Rect,
    pub content: PlacedContent,
}

impl Placed {
    fn shifted(mut self, dy: f64) -> Self {
        self.rect.y += dy;
        if let PlacedContent::Line { y1, y2, .. } = &mut self.content {
            *y1 += dy;
            *y2 += dy;
        }
        self
    }

    fn mirrored(mut self, page_width: f64) -> Self {
        self.rect.x = page_width - self.rect.x - self.rect.width;
        if let PlacedContent::Line { x1, x2, .. } = &mut self.content {
            *x1 = page_width - *x1;
            *x2 = page_width - *x2;
        }
        self
    }
}

/// One laid-out page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    /// 1-based page number.
    pub number: usize,
    /// Header, page header and footer items repeated on every page.
    pub chrome: Vec<Placed>,
    /// Body items of this page.
    pub body: Vec<Placed>,
}

impl PageLayout {
    /// Chrome first, then body, in paint order.
    pub fn items(&self) -> impl Iterator<Item = &Placed> {
        self.chrome.iter().chain(self.body.iter())
    }

    /// Text of every text item on the page, joined by newlines.
    pub fn text(&self) -> String {
        self.items()
            .filter_map(|item| match &item.content {
                PlacedContent::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything elements need to measure themselves.
pub struct MeasureContext<'a> {
    styles: &'a StyleTable,
    default_style: TextStyle,
    metrics: &'a dyn TextMetrics,
    images: Option<&'a ImageCache>,
    footnotes: RefCell<Vec<Footnote>>,
}

impl<'a> MeasureContext<'a> {
    pub fn new(
        styles: &'a StyleTable,
        default_style: TextStyle,
        metrics: &'a dyn TextMetrics,
    ) -> Self {
        Self {
            styles,
            default_style,
            metrics,
            images: None,
            footnotes: RefCell::new(Vec::new()),
        }
    }

    /// Makes decoded image dimensions available for sizing.
    pub fn with_images(mut self, images: &'a ImageCache) -> Self {
        self.images = Some(images);
        self
    }

    pub fn metrics(&self) -> &'a dyn TextMetrics {
        self.metrics
    }

    pub fn images(&self) -> Option<&'a ImageCache> {
        self.images
    }

    /// Resolves a style name through the style table, so unknown and empty
    /// names get the first-inserted style. The document default is used
    /// only when the table has nothing to offer.
    pub fn text_style(&self, name: &str, color: Option<Rgb>) -> TextStyle {
        match self.styles.get(name) {
            Some(style) => style.text_style(color),
            None => TextStyle {
                color: color.or(self.default_style.color),
                ..self.default_style.clone()
            },
        }
    }

    /// The document default style, independent of the style table.
    pub fn default_style(&self) -> &TextStyle {
        &self.default_style
    }

    pub fn compose(&self, runs: &[Run], width: f64) -> Vec<LineBox> {
        compose(runs, width, self.metrics)
    }

    /// Number of `footnote`, registering it on first sight. Notes with the
    /// same text share a number.
    pub fn footnote_number(&self, footnote: &Footnote) -> usize {
        let mut notes = self.footnotes.borrow_mut();
        if let Some(index) = notes.iter().position(|note| note.text == footnote.text) {
            return index + 1;
        }
        notes.push(footnote.clone());
        notes.len()
    }

    /// Registered footnotes in number order.
    pub fn footnotes(&self) -> Vec<Footnote> {
        self.footnotes.borrow().clone()
    }
}

/// Cursor and page state for one region.
struct Flow {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    breaks: bool,
    x: f64,
    y: f64,
    line_height: f64,
    lowest: f64,
    pages: Vec<Vec<Placed>>,
    current: Vec<Placed>,
}

impl Flow {
    fn new(left: f64, right: f64, top: f64, bottom: f64, breaks: bool) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            breaks,
            x: left,
            y: top,
            line_height: 0.0,
            lowest: top,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    /// A region without page breaks, such as the header or footer.
    fn region(left: f64, right: f64, top: f64) -> Self {
        Self::new(left, right, top, f64::INFINITY, false)
    }

    fn push(&mut self, placed: Placed) {
        self.lowest = self.lowest.max(placed.rect.bottom());
        self.current.push(placed);
    }

    fn at_region_top(&self) -> bool {
        self.y <= self.top + WRAP_EPSILON
    }

    /// Starts a new page when `height` does not fit below the cursor.
    fn ensure_room(&mut self, height: f64) {
        if self.breaks && self.y + height > self.bottom + WRAP_EPSILON && !self.at_region_top() {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        log::debug!("page break, starting page {}", self.pages.len() + 1);
        self.x = self.left;
        self.y = self.top;
        self.line_height = 0.0;
        self.lowest = self.top;
    }

    /// Moves to the start of the next line unless already there.
    fn new_line(&mut self) {
        if self.x > self.left + WRAP_EPSILON || self.line_height > 0.0 {
            self.y += self.line_height;
        }
        self.x = self.left;
        self.line_height = 0.0;
    }

    /// Updates the cursor after placing a box at `(x, y)`.
    fn advance(&mut self, x: f64, y: f64, size: Size, line_break: LineBreak, reset_height: bool) {
        let line_height = if reset_height {
            size.height
        } else {
            self.line_height.max(size.height)
        };
        match line_break {
            LineBreak::SameLine => {
                self.x = x + size.width;
                self.y = y;
                self.line_height = line_height;
            }
            LineBreak::NextLine => {
                self.y = (y + line_height).max(y + size.height);
                self.x = self.left;
                self.line_height = 0.0;
            }
            LineBreak::Explicit => {}
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height used below the region top.
    fn extent(&self) -> f64 {
        self.lowest.max(self.y + self.line_height) - self.top
    }

    fn finish(mut self) -> Vec<Vec<Placed>> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lays a [`ReportDocument`] out onto pages.
pub struct LayoutEngine<'a> {
    document: &'a ReportDocument,
    metrics: &'a dyn TextMetrics,
    images: Option<&'a ImageCache>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(document: &'a ReportDocument, metrics: &'a dyn TextMetrics) -> Self {
        Self {
            document,
            metrics,
            images: None,
        }
    }

    /// Uses decoded images for sizing images without explicit dimensions.
    pub fn with_images(mut self, images: &'a ImageCache) -> Self {
        self.images = Some(images);
        self
    }

    pub fn layout(&self) -> Vec<PageLayout> {
        let doc = self.document;
        let mut cx = MeasureContext::new(doc.styles(), doc.default_text_style(), self.metrics);
        if let Some(images) = self.images {
            cx = cx.with_images(images);
        }
        let page = doc.page_size();
        let margins = doc.margins();
        let right = page.width - margins.right;

        let mut header = Flow::region(margins.left, right, margins.header);
        for element in doc.elements_in(ProcessingPhase::Header) {
            self.place(&mut header, &cx, element);
        }
        let header = header.finish().concat();

        let mut page_header = Flow::region(margins.left, right, margins.top);
        if let Some(elements) = doc.page_header() {
            for element in elements.elements() {
                self.place(&mut page_header, &cx, element);
            }
        }
        let page_header_height = page_header.extent();
        let page_header = page_header.finish().concat();

        let mut body = Flow::new(
            margins.left,
            right,
            margins.top + page_header_height,
            page.height - margins.bottom,
            true,
        );
        for element in doc.elements_in(ProcessingPhase::Body) {
            self.place(&mut body, &cx, element);
        }

        // Footer notes are numbered after the body's.
        let footer = self.footer(&cx, margins.left, right);
        let footer_offset = page.height - margins.footer - footer.extent();
        let footer: Vec<Placed> = footer
            .finish()
            .concat()
            .into_iter()
            .map(|item| item.shifted(footer_offset))
            .collect();

        self.collate_footnotes(&mut body, &cx);

        let bodies = body.finish();
        let total = bodies.len();
        log::debug!("laid out {total} page(s)");

        bodies
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                let number = index + 1;
                let chrome = header
                    .iter()
                    .chain(&page_header)
                    .chain(&footer)
                    .cloned()
                    .collect();
                let finish = |items: Vec<Placed>| -> Vec<Placed> {
                    items
                        .into_iter()
                        .map(|item| self.substitute_page_numbers(item, number, total))
                        .map(|item| {
                            if doc.is_rtl() {
                                item.mirrored(page.width)
                            } else {
                                item
                            }
                        })
                        .collect()
                };
                PageLayout {
                    number,
                    chrome: finish(chrome),
                    body: finish(body),
                }
            })
            .collect()
    }

    fn footer(&self, cx: &MeasureContext<'_>, left: f64, right: f64) -> Flow {
        let doc = self.document;
        let mut footer = Flow::region(left, right, 0.0);
        for element in doc.elements_in(ProcessingPhase::Footer) {
            self.place(&mut footer, cx, element);
        }
        if doc.show_generated_by() && !doc.generated_by().is_empty() {
            footer.new_line();
            let style = cx.default_style().scaled(GENERATED_BY_SCALE);
            let runs = [Run::new(doc.generated_by(), style)];
            self.place_paragraph(&mut footer, cx, &runs, Align::Center);
        }
        footer
    }

    fn collate_footnotes(&self, body: &mut Flow, cx: &MeasureContext<'_>) {
        let notes = cx.footnotes();
        if notes.is_empty() {
            return;
        }
        body.new_line();
        body.ensure_room(FOOTNOTE_GAP);
        body.y += FOOTNOTE_GAP / 2.0;
        let x2 = body.left + body.width() / 3.0;
        body.push(line_item(body.left, body.y, x2, body.y, None));
        body.y += FOOTNOTE_GAP / 2.0;

        for (index, note) in notes.iter().enumerate() {
            let style = cx.text_style(&note.style, None);
            let runs = [
                Run::new(format!("{}. ", index + 1), style.clone()),
                Run::new(note.text.clone(), style),
            ];
            self.place_paragraph(body, cx, &runs, Align::Left);
        }
    }

    fn place(&self, flow: &mut Flow, cx: &MeasureContext<'_>, element: &DrawableElement) {
        match element {
            DrawableElement::Cell(cell) => self.place_cell(flow, cx, cell),
            DrawableElement::TextBox(text_box) => self.place_text_box(flow, cx, text_box),
            DrawableElement::Text(text) => {
                self.place_paragraph(flow, cx, &text.runs(cx), Align::Left)
            }
            DrawableElement::Html(html) => {
                self.place_paragraph(flow, cx, &html.runs(cx), Align::Left)
            }
            DrawableElement::Line(line) => place_line(flow, line),
            DrawableElement::Image(image) => place_image(flow, cx, image),
            DrawableElement::Footnote(footnote) => self.place_marker(flow, cx, footnote),
        }
    }

    fn place_cell(&self, flow: &mut Flow, cx: &MeasureContext<'_>, cell: &Cell) {
        let x = cell.left.map(|left| flow.left + left);
        let available = flow.right - x.unwrap_or(flow.x);
        let mut size = cell.footprint(cx, available);

        if x.is_none()
            && flow.x > flow.left + WRAP_EPSILON
            && flow.x + size.width > flow.right + WRAP_EPSILON
        {
            flow.new_line();
            size = cell.footprint(cx, flow.width());
        }
        let y = match cell.top {
            Some(top) => flow.top + top,
            None => {
                flow.ensure_room(size.height);
                flow.y
            }
        };
        let x = x.unwrap_or(flow.x);
        let rect = Rect::new(x, y, size.width, size.height);

        let fill = cell.background.filter(|_| cell.fill);
        if cell.border.is_visible() || fill.is_some() {
            flow.push(frame_item(rect, cell.border, cell.border_color, fill));
        }
        let inner = size.width - 2.0 * CELL_PADDING;
        let lines = cx.compose(&cell.runs(cx, size.width), inner);
        push_lines(flow, &lines, x + CELL_PADDING, y, inner, cell.align);

        flow.advance(x, y, size, cell.line_break, cell.reset_height);
    }

    fn place_text_box(&self, flow: &mut Flow, cx: &MeasureContext<'_>, text_box: &TextBox) {
        let x = text_box.left.map(|left| flow.left + left);
        let available = flow.right - x.unwrap_or(flow.x);
        let size = text_box.footprint(cx, available);
        let y = match text_box.top {
            Some(top) => flow.top + top,
            None => {
                if text_box.page_check {
                    flow.ensure_room(size.height);
                }
                flow.y
            }
        };
        let x = x.unwrap_or(flow.x);
        let rect = Rect::new(x, y, size.width, size.height);
        if flow.breaks && rect.bottom() > flow.bottom + WRAP_EPSILON {
            log::debug!("text box of {:.1}pt runs past the bottom margin", size.height);
        }

        let fill = text_box.background.filter(|_| text_box.fill);
        if text_box.border || fill.is_some() {
            let border = Border::from(text_box.border);
            flow.push(frame_item(rect, border, None, fill));
        }
        let inset = text_box.inset();
        let inner = size.width - 2.0 * inset;
        let lines = cx.compose(&text_box.runs(cx), inner);
        push_lines(flow, &lines, x + inset, y + inset, inner, Align::Left);

        flow.advance(
            x,
            y,
            size,
            text_box.line_break(),
            text_box.reset_height,
        );
    }

    /// Flows text from the cursor, breaking pages between lines.
    ///
    /// The paragraph ends the current line, so the cursor drops below both
    /// the text and anything taller already placed on that line.
    fn place_paragraph(&self, flow: &mut Flow, cx: &MeasureContext<'_>, runs: &[Run], align: Align) {
        let x = flow.x;
        let width = flow.right - x;
        let (page, line_top, pending) = (flow.pages.len(), flow.y, flow.line_height);
        let mut y = flow.y;
        for line in cx.compose(runs, width) {
            flow.y = y;
            flow.ensure_room(line.height);
            y = flow.y;
            let offset = line.offset(width, align);
            push_fragments(flow, &line, x + offset, y);
            y += line.height;
        }
        if flow.pages.len() == page {
            y = y.max(line_top + pending);
        }
        flow.y = y;
        flow.x = flow.left;
        flow.line_height = 0.0;
    }

    fn place_marker(&self, flow: &mut Flow, cx: &MeasureContext<'_>, footnote: &Footnote) {
        let size = footnote.footprint(cx, flow.right - flow.x);
        flow.ensure_room(size.height);
        let (x, y) = (flow.x, flow.y);
        for run in footnote.marker_runs(cx) {
            flow.push(Placed {
                rect: Rect::new(x, y, size.width, size.height),
                content: PlacedContent::Text {
                    text: run.text,
                    style: run.style,
                },
            });
        }
        flow.advance(x, y, size, footnote.line_break(), false);
    }

    fn substitute_page_numbers(&self, mut item: Placed, number: usize, total: usize) -> Placed {
        if let PlacedContent::Text { text, style } = &mut item.content {
            if text.contains(PAGE_NUMBER) || text.contains(PAGE_TOTAL) {
                *text = text
                    .replace(PAGE_NUMBER, &number.to_string())
                    .replace(PAGE_TOTAL, &total.to_string());
                item.rect.width = self.metrics.text_width(text, style);
            }
        }
        item
    }
}

fn frame_item(rect: Rect, border: Border, border_color: Option<Rgb>, fill: Option<Rgb>) -> Placed {
    Placed {
        rect,
        content: PlacedContent::Frame {
            border,
            border_color,
            fill,
        },
    }
}

fn line_item(x1: f64, y1: f64, x2: f64, y2: f64, color: Option<Rgb>) -> Placed {
    Placed {
        rect: Rect::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs()),
        content: PlacedContent::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        },
    }
}

/// Places composed lines inside a box of `width` starting at `(x, y)`.
fn push_lines(flow: &mut Flow, lines: &[LineBox], x: f64, y: f64, width: f64, align: Align) {
    let mut y = y;
    for line in lines {
        push_fragments(flow, line, x + line.offset(width, align), y);
        y += line.height;
    }
}

fn push_fragments(flow: &mut Flow, line: &LineBox, x: f64, y: f64) {
    for fragment in &line.fragments {
        flow.push(Placed {
            rect: Rect::new(x + fragment.x, y, fragment.width, line.height),
            content: PlacedContent::Text {
                text: fragment.text.clone(),
                style: fragment.style.clone(),
            },
        });
    }
}

/// Lines never move the cursor or break the page.
fn place_line(flow: &mut Flow, line: &Line) {
    let x1 = line.x1.map_or(flow.x, |x| flow.left + x);
    let y1 = line.y1.map_or(flow.y, |y| flow.top + y);
    let x2 = line.x2.map_or(flow.right, |x| flow.left + x);
    let y2 = line.y2.map_or(y1, |y| flow.top + y);
    flow.push(line_item(x1, y1, x2, y2, line.color));
}

fn place_image(flow: &mut Flow, cx: &MeasureContext<'_>, image: &Image) {
    let size = image.footprint(cx, flow.right - flow.x);
    let y = match image.y {
        Some(y) => flow.top + y,
        None => {
            flow.ensure_room(size.height);
            flow.y
        }
    };
    let x = match (image.x, image.align) {
        (Some(x), _) => flow.left + x,
        (None, Some(Align::Center)) => flow.left + (flow.width() - size.width) / 2.0,
        (None, Some(Align::Right)) => flow.right - size.width,
        (None, Some(Align::Left | Align::Justify)) => flow.left,
        (None, None) => flow.x,
    };
    flow.push(Placed {
        rect: Rect::new(x, y, size.width, size.height),
        content: PlacedContent::Image {
            source: image.source().clone(),
        },
    });
    flow.advance(x, y, size, image.line_break, false);
}
