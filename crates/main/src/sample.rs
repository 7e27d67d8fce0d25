//! A small births report exercising every element kind.

use webtrees_report::elements::{Align, Border, LineBreak};
use webtrees_report::{FontStyle, Localizer, ProcessingPhase, Report, Result, Rgb, Style};

const BIRTHS: &[(&str, &str, &str)] = &[
    ("Ada Lovelace", "10 December 1815", "London"),
    ("Charles Babbage", "26 December 1791", "London"),
    ("Mary Somerville", "26 December 1780", "Jedburgh"),
    ("Caroline Herschel", "16 March 1750", "Hanover"),
    ("Émilie du Châtelet", "17 December 1706", "Paris"),
];

pub fn build(report: &mut dyn Report, locale: &dyn Localizer) -> Result<()> {
    report.setup(locale)?;
    report.add_title("Births");
    report.add_description("Individuals born in the selected period");

    report.add_style(Style::new("text").with_font("dejavusans").with_size(9.0));
    report.add_style(
        Style::new("header")
            .with_font("dejavusans")
            .with_size(16.0)
            .with_font_style(FontStyle::parse("B")),
    );
    report.add_style(
        Style::new("label")
            .with_font("dejavusans")
            .with_size(9.0)
            .with_font_style(FontStyle::parse("B")),
    );
    report.add_style(Style::new("footnote").with_font("dejavusans").with_size(7.0));

    report.set_processing(ProcessingPhase::Header)?;
    let title = report
        .create_cell(0.0, 20.0, "header")
        .with_text("Births")
        .with_align(Align::Center);
    report.add_element(title.into());

    report.set_processing(ProcessingPhase::PageHeader)?;
    for (label, width) in [("Name", 200.0), ("Date", 150.0), ("Place", 0.0)] {
        let line_break = if width > 0.0 {
            LineBreak::SameLine
        } else {
            LineBreak::NextLine
        };
        let cell = report
            .create_cell(width, 14.0, "label")
            .with_text(label)
            .with_border(Border::parse("B"))
            .with_background(Rgb(0xee, 0xee, 0xee), true)
            .with_line_break(line_break);
        report.add_element(cell.into());
    }

    report.set_processing(ProcessingPhase::Body)?;
    for (name, date, place) in BIRTHS.iter().cycle().take(60) {
        let name_cell = report
            .create_cell(200.0, 12.0, "text")
            .with_text(*name)
            .with_line_break(LineBreak::SameLine);
        report.add_element(name_cell.into());

        let date_cell = report
            .create_cell(150.0, 12.0, "text")
            .with_text(*date)
            .with_line_break(LineBreak::SameLine);
        report.add_element(date_cell.into());

        let mut place_box = report.create_text_box(0.0, 12.0, "text");
        place_box.add_element(report.create_text("text", None).with_text(*place));
        place_box.add_element(
            report
                .create_footnote("footnote")
                .with_text(format!("Parish register of {place}")),
        );
        report.add_element(place_box.with_newline(true).into());
    }

    let rule = report
        .create_line(None, None, None, None)
        .with_color(Rgb(0x80, 0x80, 0x80));
    report.add_element(rule.into());

    let mut summary = report.create_text_box(0.0, 0.0, "text");
    let label = report.create_html("b", Vec::new()).with_text("Total:");
    summary.add_element(
        report
            .create_html("span", Vec::new())
            .with_element(label)
            .with_text(" 60 births"),
    );
    report.add_element(summary.with_newline(true).into());

    report.set_processing(ProcessingPhase::Footer)?;
    let page_number = report
        .create_cell(0.0, 10.0, "text")
        .with_text("Page {PAGENUM} of {PAGETOTAL}")
        .with_align(Align::Right);
    report.add_element(page_number.into());

    Ok(())
}
