use webtrees_report::elements::{Border, LineBreak};
use webtrees_report::layout::{LayoutEngine, PageLayout, Placed, PlacedContent, StandardMetrics};
use webtrees_report::{
    ProcessingPhase, ReportConfig, ReportDocument, StaticLocale, Style, TextDirection,
};

fn document(direction: TextDirection) -> ReportDocument {
    let mut document = ReportDocument::new(ReportConfig::new());
    document
        .setup(&StaticLocale::new().with_direction(direction))
        .expect("setup");
    document.add_style(Style::new("text").with_size(10.0));
    document
}

fn layout(document: &ReportDocument) -> Vec<PageLayout> {
    LayoutEngine::new(document, &StandardMetrics).layout()
}

fn text_item<'a>(items: &'a [Placed], text: &str) -> &'a Placed {
    items
        .iter()
        .find(|item| matches!(&item.content, PlacedContent::Text { text: t, .. } if t == text))
        .unwrap_or_else(|| panic!("no text item {text:?}"))
}

fn frames(items: &[Placed]) -> Vec<&Placed> {
    items
        .iter()
        .filter(|item| matches!(item.content, PlacedContent::Frame { .. }))
        .collect()
}

#[test]
fn cells_follow_their_line_break_policy() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    for (text, line_break) in [
        ("A", LineBreak::SameLine),
        ("B", LineBreak::NextLine),
        ("C", LineBreak::SameLine),
    ] {
        let cell = doc
            .create_cell(100.0, 20.0, "text")
            .with_text(text)
            .with_line_break(line_break);
        doc.add_element(cell);
    }

    let pages = layout(&doc);
    assert_eq!(pages.len(), 1);
    let body = &pages[0].body;
    let (a, b, c) = (
        text_item(body, "A").rect,
        text_item(body, "B").rect,
        text_item(body, "C").rect,
    );
    assert!((b.x - a.x - 100.0).abs() < 1e-9);
    assert_eq!(b.y, a.y);
    assert_eq!(c.x, a.x);
    assert!((c.y - a.y - 20.0).abs() < 1e-9);
}

#[test]
fn body_starts_below_the_top_margin() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    let cell = doc
        .create_cell(100.0, 20.0, "text")
        .with_text("x")
        .with_border(Border::ALL);
    doc.add_element(cell);

    let pages = layout(&doc);
    let frame = frames(&pages[0].body)[0].rect;
    assert_eq!((frame.x, frame.y), (51.0, 76.0));
    assert_eq!((frame.width, frame.height), (100.0, 20.0));
}

#[test]
fn long_bodies_break_pages_and_repeat_the_page_header() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::PageHeader).expect("phase");
    let heading = doc
        .create_cell(0.0, 14.0, "text")
        .with_text("Name")
        .with_line_break(LineBreak::NextLine);
    doc.add_element(heading);

    doc.set_processing(ProcessingPhase::Body).expect("phase");
    for index in 0..60 {
        let cell = doc
            .create_cell(0.0, 20.0, "text")
            .with_text(format!("Row {index}"))
            .with_line_break(LineBreak::NextLine);
        doc.add_element(cell);
    }

    let pages = layout(&doc);
    assert_eq!(pages.len(), 2);
    for page in &pages {
        let heading = text_item(&page.chrome, "Name").rect;
        assert!(heading.y >= 76.0 && heading.y < 90.0);
    }

    let first_row = text_item(&pages[0].body, "Row 0").rect;
    assert!(first_row.y >= 90.0);
    let continued = pages[1]
        .body
        .iter()
        .find(|item| matches!(&item.content, PlacedContent::Text { .. }))
        .expect("second page has rows")
        .rect;
    assert_eq!(continued.y, first_row.y);

    let bottom = doc.page_height() - doc.margins().bottom;
    for page in &pages {
        for item in &page.body {
            assert!(item.rect.bottom() <= bottom + 0.01);
        }
    }
}

#[test]
fn footer_substitutes_page_numbers() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    for _ in 0..50 {
        let cell = doc
            .create_cell(0.0, 20.0, "text")
            .with_text("row")
            .with_line_break(LineBreak::NextLine);
        doc.add_element(cell);
    }
    doc.set_processing(ProcessingPhase::Footer).expect("phase");
    let footer = doc
        .create_cell(0.0, 10.0, "text")
        .with_text("Page {PAGENUM} of {PAGETOTAL}");
    doc.add_element(footer);

    let pages = layout(&doc);
    assert_eq!(pages.len(), 2);
    assert!(pages[0].text().contains("Page 1 of 2"));
    assert!(pages[1].text().contains("Page 2 of 2"));
    assert!(pages[1].text().contains("Generated by webtrees"));

    let footer_text = text_item(&pages[0].chrome, "Page 1 of 2").rect;
    assert!(footer_text.bottom() <= doc.page_height() - doc.margins().footer);
    assert!(footer_text.y > doc.page_height() - doc.margins().bottom);
}

#[test]
fn generated_by_can_be_hidden() {
    let mut doc = ReportDocument::new(ReportConfig::new().with_show_generated_by(false));
    doc.setup(&StaticLocale::new()).expect("setup");
    let pages = layout(&doc);
    assert_eq!(pages.len(), 1);
    assert!(!pages[0].text().contains("Generated by"));
}

#[test]
fn rtl_mirrors_horizontal_coordinates() {
    let place = |direction| {
        let mut doc = document(direction);
        doc.set_processing(ProcessingPhase::Body).expect("phase");
        let cell = doc
            .create_cell(100.0, 20.0, "text")
            .with_text("x")
            .with_border(Border::ALL);
        doc.add_element(cell);
        let pages = layout(&doc);
        (doc.page_width(), frames(&pages[0].body)[0].rect)
    };

    let (_, ltr) = place(TextDirection::Ltr);
    let (page_width, rtl) = place(TextDirection::Rtl);
    assert_eq!(ltr.x, 51.0);
    assert!((rtl.x - (page_width - 51.0 - 100.0)).abs() < 1e-9);
    assert_eq!(rtl.y, ltr.y);
}

#[test]
fn footnotes_are_numbered_once_and_collected_at_the_end() {
    let mut doc = document(TextDirection::Ltr);
    doc.add_style(Style::new("note").with_size(8.0));
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    for (name, source) in [
        ("Ann", "Parish register"),
        ("Bob", "Census 1841"),
        ("Cid", "Parish register"),
    ] {
        let mut text_box = doc.create_text_box(0.0, 0.0, "text").with_newline(true);
        text_box.add_element(doc.create_text("text", None).with_text(name));
        text_box.add_element(doc.create_footnote("note").with_text(source));
        doc.add_element(text_box);
    }

    let pages = layout(&doc);
    let text = pages.last().expect("page").text();
    assert_eq!(text.matches("Parish register").count(), 1);
    assert_eq!(text.matches("Census 1841").count(), 1);

    let body = &pages[0].body;
    let rows: Vec<f64> = ["Ann", "Bob", "Cid"]
        .iter()
        .map(|name| text_item(body, name).rect.y)
        .collect();
    let notes = body
        .iter()
        .filter(|item| matches!(&item.content, PlacedContent::Text { text, .. } if text.contains("Parish register")))
        .map(|item| item.rect.y)
        .next()
        .expect("collated note");
    assert!(notes > rows[2]);
    assert!(body
        .iter()
        .any(|item| matches!(item.content, PlacedContent::Line { .. })));
}

fn image_rect(items: &[Placed]) -> webtrees_report::layout::Rect {
    items
        .iter()
        .find(|item| matches!(item.content, PlacedContent::Image { .. }))
        .map(|item| item.rect)
        .expect("image item")
}

/// A 40pt same-line cell, then `follow`, then a cell that must start below
/// the tall cell.
fn after_tall_cell(follow: impl FnOnce(&mut ReportDocument)) -> (Vec<Placed>, f64) {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    let tall = doc
        .create_cell(100.0, 40.0, "text")
        .with_text("tall")
        .with_line_break(LineBreak::SameLine);
    doc.add_element(tall);
    follow(&mut doc);
    let below = doc
        .create_cell(100.0, 20.0, "text")
        .with_text("below")
        .with_line_break(LineBreak::NextLine);
    doc.add_element(below);

    let pages = layout(&doc);
    assert_eq!(pages.len(), 1);
    let body = pages[0].body.clone();
    let tall_bottom = text_item(&body, "tall").rect.y + 40.0;
    (body, tall_bottom)
}

#[test]
fn text_after_a_taller_cell_ends_below_the_cell() {
    let (body, tall_bottom) = after_tall_cell(|doc| {
        let text = doc.create_text("text", None).with_text("caption");
        doc.add_element(text);
    });
    assert_eq!(text_item(&body, "caption").rect.y, text_item(&body, "tall").rect.y);
    assert!(text_item(&body, "below").rect.y >= tall_bottom);
}

#[test]
fn html_after_a_taller_cell_ends_below_the_cell() {
    let (body, tall_bottom) = after_tall_cell(|doc| {
        let html = doc
            .create_html("span", Vec::new())
            .with_style("text")
            .with_text("caption");
        doc.add_element(html);
    });
    assert!(text_item(&body, "below").rect.y >= tall_bottom);
}

#[test]
fn footnote_marker_after_a_taller_cell_keeps_the_line_height() {
    let (body, tall_bottom) = after_tall_cell(|doc| {
        let note = doc.create_footnote("text").with_text("Parish register");
        doc.add_element(note);
        let mid = doc
            .create_cell(50.0, 10.0, "text")
            .with_text("mid")
            .with_line_break(LineBreak::NextLine);
        doc.add_element(mid);
    });
    assert_eq!(text_item(&body, "mid").rect.y, text_item(&body, "tall").rect.y);
    assert!(text_item(&body, "below").rect.y >= tall_bottom);
}

#[test]
fn cells_after_a_taller_same_line_image_start_below_it() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    let image = doc
        .create_image("portrait.png", 60.0, 60.0)
        .with_line_break(LineBreak::SameLine);
    doc.add_element(image);
    let beside = doc
        .create_cell(100.0, 20.0, "text")
        .with_text("beside")
        .with_line_break(LineBreak::NextLine);
    doc.add_element(beside);
    let below = doc
        .create_cell(100.0, 20.0, "text")
        .with_text("below")
        .with_line_break(LineBreak::NextLine);
    doc.add_element(below);

    let pages = layout(&doc);
    let body = &pages[0].body;
    let image = image_rect(body);
    let beside = text_item(body, "beside").rect;
    assert_eq!(beside.y, image.y);
    assert!(beside.x >= image.right());
    assert!(text_item(body, "below").rect.y >= image.bottom());
}

#[test]
fn unknown_and_empty_style_names_render_with_the_first_style() {
    let mut doc = ReportDocument::new(ReportConfig::new());
    doc.setup(&StaticLocale::new()).expect("setup");
    doc.add_style(Style::new("title").with_size(20.0));
    doc.add_style(Style::new("small").with_size(8.0));
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    let unnamed = doc.create_text("", None).with_text("unnamed");
    doc.add_element(unnamed);
    let unknown = doc.create_text("missing", None).with_text("unknown");
    doc.add_element(unknown);
    let html = doc.create_html("span", Vec::new()).with_text("markup");
    doc.add_element(html);

    let pages = layout(&doc);
    let body = &pages[0].body;
    for text in ["unnamed", "unknown", "markup"] {
        match &text_item(body, text).content {
            PlacedContent::Text { style, .. } => assert_eq!(style.size, 20.0, "{text}"),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(doc.get_style("").map(|style| style.size()), Some(20.0));
}

#[test]
fn body_footnotes_are_numbered_before_footer_footnotes() {
    let mut doc = document(TextDirection::Ltr);
    doc.set_processing(ProcessingPhase::Body).expect("phase");
    let mut text_box = doc.create_text_box(0.0, 0.0, "text").with_newline(true);
    text_box.add_element(doc.create_text("text", None).with_text("Ann"));
    text_box.add_element(doc.create_footnote("text").with_text("Body source"));
    doc.add_element(text_box);
    doc.set_processing(ProcessingPhase::Footer).expect("phase");
    let note = doc.create_footnote("text").with_text("Footer source");
    doc.add_element(note);

    let pages = layout(&doc);
    let body = &pages[0].body;
    let y_of = |needle: &str| {
        body.iter()
            .find(|item| matches!(&item.content, PlacedContent::Text { text, .. } if text.contains(needle)))
            .map(|item| item.rect.y)
            .unwrap_or_else(|| panic!("no collated {needle:?}"))
    };
    assert!(y_of("Body source") < y_of("Footer source"));
    assert!(pages[0]
        .chrome
        .iter()
        .any(|item| matches!(&item.content, PlacedContent::Text { text, .. } if text == "2")));
}
