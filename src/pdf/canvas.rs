//! A genpdf element that paints pre-positioned layout items.
//!
//! Layout has already decided every coordinate, so the canvas only converts
//! points to millimetres and draws each item relative to the page corner.

use std::rc::Rc;

use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Mm, Position, RenderResult, Scale, Size};
use image::{DynamicImage, GenericImageView};

use crate::elements::{Border, ImageCache, ImageSource};
use crate::geometry::pt_to_mm;
use crate::layout::{Placed, PlacedContent};
use crate::style::{Rgb, TextStyle};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const UNDERLINE_OFFSET_MM: f64 = 0.4;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts a length in points to genpdf millimetres.
fn mm_from_pt(points: f64) -> Mm {
    mm_from_f64(pt_to_mm(points))
}

fn estimated_image_size(image: &DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

fn font_size(size: f64) -> u8 {
    size.round().clamp(1.0, f64::from(u8::MAX)) as u8
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

fn pdf_style(text_style: &TextStyle) -> Style {
    let mut style = Style::new().with_font_size(font_size(text_style.size));
    if text_style.bold {
        style.set_bold();
    }
    if text_style.italic {
        style.set_italic();
    }
    if let Some(rgb) = text_style.color {
        style.set_color(color(rgb));
    }
    style
}

fn stroke(rgb: Option<Rgb>) -> Style {
    let mut line_style = Style::new();
    if let Some(rgb) = rgb {
        line_style = line_style.with_color(color(rgb));
    }
    line_style
}

/// Items of one page region, painted in order.
pub struct PageCanvas {
    items: Vec<Placed>,
    images: Rc<ImageCache>,
}

impl PageCanvas {
    pub fn new(items: Vec<Placed>, images: Rc<ImageCache>) -> Self {
        Self { items, images }
    }

    fn draw_text(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        item: &Placed,
        text: &str,
        text_style: &TextStyle,
    ) -> Result<(), Error> {
        let style = pdf_style(text_style);
        let x = mm_from_pt(item.rect.x);
        let y = mm_from_pt(item.rect.y);

        match area.text_section(&context.font_cache, Position::new(x, y), style) {
            Some(mut section) => section.print_str(text, style)?,
            None => {
                log::warn!(
                    "no room for {text:?} at {:.1}pt,{:.1}pt, skipping",
                    item.rect.x,
                    item.rect.y
                );
                return Ok(());
            }
        }

        if text_style.underline {
            let baseline = y
                + style
                    .font(&context.font_cache)
                    .glyph_height(style.font_size())
                + mm_from_f64(UNDERLINE_OFFSET_MM);
            area.draw_line(
                vec![
                    Position::new(x, baseline),
                    Position::new(x + mm_from_pt(item.rect.width), baseline),
                ],
                stroke(text_style.color),
            );
        }
        Ok(())
    }

    fn draw_image(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        item: &Placed,
        source: &ImageSource,
        style: Style,
    ) -> Result<(), Error> {
        let Some(loaded) = self.images.get(source) else {
            log::warn!("image {source} was not loaded, skipping");
            return Ok(());
        };

        // genpdf cannot embed alpha channels.
        let rgb = DynamicImage::ImageRgb8(loaded.decoded().to_rgb8());
        let natural = estimated_image_size(&rgb, DEFAULT_IMAGE_DPI);
        let natural_width = mm_to_f64(natural.width);
        let natural_height = mm_to_f64(natural.height);
        if natural_width <= 0.0 || natural_height <= 0.0 {
            return Ok(());
        }

        let mut image = genpdf::elements::Image::from_dynamic_image(rgb)?;
        image.set_position(Position::new(
            mm_from_pt(item.rect.x),
            mm_from_pt(item.rect.y),
        ));
        image.set_scale(Scale::new(
            pt_to_mm(item.rect.width) / natural_width,
            pt_to_mm(item.rect.height) / natural_height,
        ));
        image.render(context, area.clone(), style)?;
        Ok(())
    }
}

fn draw_frame(
    area: &render::Area<'_>,
    item: &Placed,
    border: &Border,
    border_color: Option<Rgb>,
    fill: Option<Rgb>,
) {
    if let Some(fill) = fill {
        log::warn!(
            "background fill {} is not painted in PDF output",
            fill.to_hex()
        );
    }
    if !border.is_visible() {
        return;
    }

    let left = mm_from_pt(item.rect.x);
    let top = mm_from_pt(item.rect.y);
    let right = mm_from_pt(item.rect.right());
    let bottom = mm_from_pt(item.rect.bottom());

    for (visible, from, to) in [
        (border.left, Position::new(left, top), Position::new(left, bottom)),
        (border.top, Position::new(left, top), Position::new(right, top)),
        (border.right, Position::new(right, top), Position::new(right, bottom)),
        (border.bottom, Position::new(left, bottom), Position::new(right, bottom)),
    ] {
        if visible {
            area.draw_line(vec![from, to], stroke(border_color));
        }
    }
}

impl Element for PageCanvas {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        for item in &self.items {
            match &item.content {
                PlacedContent::Text {
                    text,
                    style: text_style,
                } => self.draw_text(context, &area, item, text, text_style)?,
                PlacedContent::Frame {
                    border,
                    border_color,
                    fill,
                } => draw_frame(&area, item, border, *border_color, *fill),
                PlacedContent::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                } => area.draw_line(
                    vec![
                        Position::new(mm_from_pt(*x1), mm_from_pt(*y1)),
                        Position::new(mm_from_pt(*x2), mm_from_pt(*y2)),
                    ],
                    stroke(*color),
                ),
                PlacedContent::Image { source } => {
                    self.draw_image(context, &area, item, source, style)?
                }
            }
        }
        Ok(RenderResult::default())
    }
}
