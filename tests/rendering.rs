use std::fs;
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb as Pixel};
use sha2::{Digest, Sha256};
use webtrees_report::elements::{Align, Border, LineBreak};
use webtrees_report::pdf::fonts;
use webtrees_report::{
    FilesystemMediaStore, HtmlReport, MediaFile, PdfReport, ProcessingPhase, Report,
    ReportConfig, ReportDocument, ReportError, Rgb, StaticLocale, Style,
};

fn build_sample(report: &mut dyn Report) {
    report.setup(&StaticLocale::new()).expect("setup");
    report.add_title("Births");
    report.add_description("Individuals born in Yorkshire");
    report.add_style(Style::new("text").with_size(10.0));
    report.add_style(Style::new("header").with_size(14.0));

    report.set_processing(ProcessingPhase::Header).expect("phase");
    let title = report
        .create_cell(0.0, 20.0, "header")
        .with_text("Births")
        .with_align(Align::Center)
        .with_line_break(LineBreak::NextLine);
    report.add_element(title.into());

    report.set_processing(ProcessingPhase::Body).expect("phase");
    for name in ["Ann Smith", "Bob Jones", "Cid Brown"] {
        let cell = report
            .create_cell(200.0, 16.0, "text")
            .with_text(name)
            .with_border(Border::ALL)
            .with_line_break(LineBreak::NextLine);
        report.add_element(cell.into());
    }
    let rule = report.create_line(None, None, None, None);
    report.add_element(rule.into());

    report.set_processing(ProcessingPhase::Footer).expect("phase");
    let footer = report
        .create_cell(0.0, 10.0, "text")
        .with_text("Page {PAGENUM}")
        .with_align(Align::Right)
        .with_colors(None, Some(Rgb(0x44, 0x44, 0x44)));
    report.add_element(footer.into());
}

fn render_sample_pdf() -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let mut report = PdfReport::new(ReportDocument::new(ReportConfig::new()));
    build_sample(&mut report);
    let mut bytes = Vec::new();
    report.run(&mut bytes).expect("render sample pdf");
    Some(bytes)
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let buffer = ImageBuffer::from_fn(width, height, |x, y| Pixel([x as u8, y as u8, 200]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode png");
    bytes
}

/// Zeroes the values genpdf varies between runs: timestamps, the producer
/// string and the document ID.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    let mut data = bytes.to_vec();
    let varying: [(&[u8], u8); 4] = [
        (b"/CreationDate(", b')'),
        (b"/ModDate(", b')'),
        (b"/Producer(", b')'),
        (b"/ID[", b']'),
    ];
    for (key, terminator) in varying {
        let mut index = 0;
        while let Some(found) = data[index..].windows(key.len()).position(|w| w == key) {
            let mut cursor = index + found + key.len();
            while cursor < data.len() && data[cursor] != terminator {
                if terminator == b')' || !b"<> \r\n\t".contains(&data[cursor]) {
                    data[cursor] = b'0';
                }
                cursor += 1;
            }
            index = cursor;
        }
    }
    data
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn html_contains_every_page_item() {
    let mut report = HtmlReport::new(ReportDocument::new(ReportConfig::new()));
    build_sample(&mut report);
    let mut bytes = Vec::new();
    report.run(&mut bytes).expect("render html");
    let html = String::from_utf8(bytes).expect("utf-8");

    assert!(html.contains("<title>Births</title>"));
    assert!(html.contains("content=\"Individuals born in Yorkshire\""));
    assert_eq!(html.matches("class=\"page\"").count(), 1);
    for name in ["Ann Smith", "Bob Jones", "Cid Brown", "Page 1"] {
        assert!(html.contains(&format!(">{name}</span>")), "missing {name}");
    }
    assert!(html.contains("Generated by webtrees"));
    assert!(html.contains("color:#444444;"));
    assert!(html.contains("border-left:"));
    assert!(html.contains("<line "));
}

#[test]
fn html_embeds_media_images() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("portrait.png"), png_bytes(8, 4)).expect("write png");

    let mut report = HtmlReport::new(ReportDocument::new(ReportConfig::new()))
        .with_media_store(FilesystemMediaStore::new(dir.path()));
    report.setup(&StaticLocale::new()).expect("setup");
    report.set_processing(ProcessingPhase::Body).expect("phase");
    let image = report.create_image_from_object(MediaFile::new("M1", "portrait.png"), 40.0, 0.0);
    report.add_element(image.into());

    let html = report.render().expect("render");
    assert!(html.contains("src=\"data:image/png;base64,"));
    assert!(html.contains("width:40.00pt;height:20.00pt;"));
}

#[test]
fn missing_images_abort_the_render() {
    let mut html = HtmlReport::new(ReportDocument::new(ReportConfig::new()));
    html.setup(&StaticLocale::new()).expect("setup");
    html.set_processing(ProcessingPhase::Body).expect("phase");
    let image = html.create_image("/nonexistent/portrait.png".into(), 40.0, 40.0);
    html.add_element(image.into());
    assert!(matches!(
        html.run(&mut Vec::<u8>::new()),
        Err(ReportError::MissingImageSource { .. })
    ));

    let mut pdf = PdfReport::new(ReportDocument::new(ReportConfig::new()));
    pdf.setup(&StaticLocale::new()).expect("setup");
    pdf.set_processing(ProcessingPhase::Body).expect("phase");
    let image = pdf.create_image_from_object(MediaFile::new("M2", "../secret.png"), 40.0, 40.0);
    pdf.add_element(image.into());
    assert!(matches!(
        pdf.render(),
        Err(ReportError::MissingImageSource { .. })
    ));
}

#[test]
fn renders_non_empty_output() {
    let Some(bytes) = render_sample_pdf() else {
        eprintln!(
            "Skipping renders_non_empty_output: report fonts missing. Set REPORT_FONTS_DIR or copy assets/fonts next to the binary."
        );
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF file");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Subject"), "subject should be merged into the info dictionary");
}

#[test]
fn rendering_is_deterministic() {
    let Some(bytes_a) = render_sample_pdf() else {
        eprintln!(
            "Skipping rendering_is_deterministic: report fonts missing. Set REPORT_FONTS_DIR or copy assets/fonts next to the binary."
        );
        return;
    };
    let Some(bytes_b) = render_sample_pdf() else {
        eprintln!(
            "Skipping rendering_is_deterministic: report fonts missing. Set REPORT_FONTS_DIR or copy assets/fonts next to the binary."
        );
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}
