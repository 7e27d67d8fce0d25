//! Standalone HTML output.
//!
//! Every laid-out page becomes a fixed-size `div` whose children are
//! absolutely positioned in points, so the HTML pages match the PDF pages
//! item for item. Images are embedded as `data:` URIs.

use std::io::Write;

use base64::Engine as _;

use crate::document::{Report, ReportDocument};
use crate::elements::ImageCache;
use crate::error::Result;
use crate::layout::{LayoutEngine, PageLayout, Placed, PlacedContent, StandardMetrics};
use crate::media::{MediaStore, NoMedia};
use crate::richtext::escape_html;
use crate::style::{Rgb, TextStyle};

/// Stroke width of borders and lines in points.
const STROKE_WIDTH: f64 = 0.5;

const STYLESHEET: &str = "body { margin: 0; background: #e0e0e0; }\n\
.page { position: relative; overflow: hidden; margin: 0 auto 12pt; background: #fff; }\n\
.page > span, .page > div, .page > img, .page > svg { position: absolute; }\n\
.page > span { white-space: pre; }\n";

/// Renders a report as a single HTML document.
pub struct HtmlReport {
    document: ReportDocument,
    media: Box<dyn MediaStore>,
}

impl HtmlReport {
    pub fn new(document: ReportDocument) -> Self {
        Self {
            document,
            media: Box::new(NoMedia),
        }
    }

    /// Resolves media references through `store`.
    pub fn with_media_store(mut self, store: impl MediaStore + 'static) -> Self {
        self.media = Box::new(store);
        self
    }

    /// Lays the document out and returns the HTML text.
    pub fn render(&self) -> Result<String> {
        let doc = &self.document;
        let images = ImageCache::load(doc.images(), self.media.as_ref())?;
        let pages = LayoutEngine::new(doc, &StandardMetrics)
            .with_images(&images)
            .layout();

        let mut out = String::new();
        self.write_head(&mut out);
        for page in &pages {
            write_page(&mut out, doc, page, &images);
        }
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn write_head(&self, out: &mut String) {
        let doc = &self.document;
        let direction = if doc.is_rtl() { "rtl" } else { "ltr" };
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&format!("<html dir=\"{direction}\">\n<head>\n"));
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(doc.title())));
        for (name, content) in [
            ("description", doc.subject()),
            ("author", doc.author()),
            ("keywords", doc.keywords()),
            ("generator", doc.author()),
        ] {
            if !content.is_empty() {
                out.push_str(&format!(
                    "<meta name=\"{name}\" content=\"{}\">\n",
                    escape_html(content)
                ));
            }
        }
        out.push_str("<style>\n");
        out.push_str(STYLESHEET);
        out.push_str("</style>\n</head>\n<body>\n");
    }
}

impl Report for HtmlReport {
    fn document(&self) -> &ReportDocument {
        &self.document
    }

    fn document_mut(&mut self) -> &mut ReportDocument {
        &mut self.document
    }

    fn run(&mut self, writer: &mut dyn Write) -> Result<()> {
        let html = self.render()?;
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn write_page(out: &mut String, doc: &ReportDocument, page: &PageLayout, images: &ImageCache) {
    out.push_str(&format!(
        "<div class=\"page\" id=\"page-{}\" style=\"width:{:.2}pt;height:{:.2}pt\">\n",
        page.number,
        doc.page_width(),
        doc.page_height()
    ));

    let mut lines = Vec::new();
    for item in page.items() {
        match &item.content {
            PlacedContent::Text { text, style } => write_text(out, item, text, style),
            PlacedContent::Frame {
                border,
                border_color,
                fill,
            } => {
                let color = border_color.unwrap_or(Rgb::BLACK).to_hex();
                let mut css = position(item);
                css.push_str("box-sizing:border-box;");
                for (side, visible) in [
                    ("left", border.left),
                    ("top", border.top),
                    ("right", border.right),
                    ("bottom", border.bottom),
                ] {
                    if visible {
                        css.push_str(&format!("border-{side}:{STROKE_WIDTH}pt solid {color};"));
                    }
                }
                if let Some(fill) = fill {
                    css.push_str(&format!("background-color:{};", fill.to_hex()));
                }
                out.push_str(&format!("<div style=\"{css}\"></div>\n"));
            }
            PlacedContent::Line { .. } => lines.push(item),
            PlacedContent::Image { source } => match images.get(source) {
                Some(image) => {
                    let payload = base64::engine::general_purpose::STANDARD.encode(image.bytes());
                    out.push_str(&format!(
                        "<img style=\"{}\" src=\"data:{};base64,{payload}\" alt=\"\">\n",
                        position(item),
                        image.mime_type()
                    ));
                }
                None => log::warn!("image {source} was not loaded, skipping"),
            },
        }
    }

    if !lines.is_empty() {
        out.push_str(&format!(
            "<svg style=\"left:0;top:0\" width=\"{w:.2}pt\" height=\"{h:.2}pt\" viewBox=\"0 0 {w:.2} {h:.2}\">\n",
            w = doc.page_width(),
            h = doc.page_height()
        ));
        for item in lines {
            if let PlacedContent::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } = &item.content
            {
                out.push_str(&format!(
                    "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{STROKE_WIDTH}\"/>\n",
                    color.unwrap_or(Rgb::BLACK).to_hex()
                ));
            }
        }
        out.push_str("</svg>\n");
    }
    out.push_str("</div>\n");
}

fn write_text(out: &mut String, item: &Placed, text: &str, style: &TextStyle) {
    let mut css = position(item);
    css.push_str(&format!(
        "font-family:'{}';font-size:{:.2}pt;line-height:{:.2}pt;",
        escape_html(&style.font),
        style.size,
        item.rect.height
    ));
    if style.bold {
        css.push_str("font-weight:bold;");
    }
    if style.italic {
        css.push_str("font-style:italic;");
    }
    if style.underline {
        css.push_str("text-decoration:underline;");
    }
    if let Some(color) = style.color {
        css.push_str(&format!("color:{};", color.to_hex()));
    }
    out.push_str(&format!("<span style=\"{css}\">{}</span>\n", escape_html(text)));
}

fn position(item: &Placed) -> String {
    format!(
        "left:{:.2}pt;top:{:.2}pt;width:{:.2}pt;height:{:.2}pt;",
        item.rect.x, item.rect.y, item.rect.width, item.rect.height
    )
}
