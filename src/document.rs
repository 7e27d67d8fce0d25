//! The report document: configuration, phase tracking and the element stream.
//!
//! A report definition drives a [`ReportDocument`] through a fixed sequence:
//! build a [`ReportConfig`], call [`ReportDocument::setup`], register styles,
//! then create elements while moving through the processing phases. Backends
//! implement [`Report`] and turn the finished document into output.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::elements::{
    Cell, DrawableElement, Footnote, Html, Image, ImageSource, Line, PageHeader, Text, TextBox,
};
use crate::error::{ReportError, Result};
use crate::geometry::{validate_custom, Margins, Orientation, PageFormat, PageSize};
use crate::locale::{Localizer, TextDirection};
use crate::media::MediaFile;
use crate::style::{Rgb, Style, StyleFallback, StyleTable, TextStyle};

/// Font family used when a style names none.
pub const DEFAULT_FONT: &str = "dejavusans";
/// Font size in points used when a style names none.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Product named in the "Generated by" line and the document author.
pub const PRODUCT_NAME: &str = "webtrees";
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which structural region elements are currently being created for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessingPhase {
    #[default]
    Header,
    PageHeader,
    Body,
    Footer,
}

impl ProcessingPhase {
    /// Parses the report-definition codes `H`, `PH`, `B` and `F`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "H" => Some(ProcessingPhase::Header),
            "PH" => Some(ProcessingPhase::PageHeader),
            "B" => Some(ProcessingPhase::Body),
            "F" => Some(ProcessingPhase::Footer),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ProcessingPhase::Header => "H",
            ProcessingPhase::PageHeader => "PH",
            ProcessingPhase::Body => "B",
            ProcessingPhase::Footer => "F",
        }
    }
}

impl fmt::Display for ProcessingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Settings fixed before a document is created.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    margins: Margins,
    page_format: PageFormat,
    orientation: Orientation,
    default_font: String,
    default_font_size: f64,
    show_generated_by: bool,
    product_name: String,
    product_version: String,
    style_fallback: StyleFallback,
    enforce_phase_order: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            page_format: PageFormat::default(),
            orientation: Orientation::default(),
            default_font: DEFAULT_FONT.to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
            show_generated_by: true,
            product_name: PRODUCT_NAME.to_string(),
            product_version: PRODUCT_VERSION.to_string(),
            style_fallback: StyleFallback::default(),
            enforce_phase_order: false,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_page_format(mut self, page_format: PageFormat) -> Self {
        self.page_format = page_format;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Uses an explicit page size; it is validated by [`ReportDocument::setup`].
    pub fn with_custom_size(mut self, width: f64, height: f64) -> Self {
        self.page_format = PageFormat::Custom { width, height };
        self
    }

    pub fn with_default_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.default_font = font.into();
        self.default_font_size = size;
        self
    }

    /// Whether the footer ends with the "Generated by" line.
    pub fn with_show_generated_by(mut self, show: bool) -> Self {
        self.show_generated_by = show;
        self
    }

    pub fn with_product(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.product_name = name.into();
        self.product_version = version.into();
        self
    }

    pub fn with_style_fallback(mut self, fallback: StyleFallback) -> Self {
        self.style_fallback = fallback;
        self
    }

    /// Rejects backward phase transitions in [`ReportDocument::set_processing`].
    pub fn enforce_phase_order(mut self, enforce: bool) -> Self {
        self.enforce_phase_order = enforce;
        self
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn page_format(&self) -> PageFormat {
        self.page_format
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    pub fn default_font_size(&self) -> f64 {
        self.default_font_size
    }

    pub fn show_generated_by(&self) -> bool {
        self.show_generated_by
    }

    /// `"<name> <version>"`, as shown in the footer and used as author.
    pub fn product(&self) -> String {
        format!("{} {}", self.product_name, self.product_version)
    }
}

/// An element together with the phase it was created in.
#[derive(Clone, Debug, PartialEq)]
pub struct PhasedElement {
    pub phase: ProcessingPhase,
    pub element: DrawableElement,
}

/// Layout-independent state of one report render.
#[derive(Clone, Debug)]
pub struct ReportDocument {
    config: ReportConfig,
    page_width: f64,
    page_height: f64,
    rtl: Option<bool>,
    styles: StyleTable,
    processing: ProcessingPhase,
    title: String,
    rsubject: String,
    rauthor: String,
    rkeywords: String,
    generated_by: String,
    elements: Vec<PhasedElement>,
    page_header: Option<PageHeader>,
}

impl ReportDocument {
    pub fn new(config: ReportConfig) -> Self {
        let size = config.page_format.dimensions().oriented(config.orientation);
        Self {
            styles: StyleTable::with_fallback(config.style_fallback),
            page_width: size.width,
            page_height: size.height,
            rtl: None,
            processing: ProcessingPhase::default(),
            title: String::new(),
            rsubject: String::new(),
            rauthor: String::new(),
            rkeywords: String::new(),
            generated_by: String::new(),
            elements: Vec::new(),
            page_header: None,
            config,
        }
    }

    /// Seals direction, metadata and page geometry.
    ///
    /// Fails with [`ReportError::InvalidGeometry`] when a custom page size is
    /// below the minimum.
    pub fn setup(&mut self, locale: &dyn Localizer) -> Result<()> {
        if self.rtl.is_none() {
            self.rtl = Some(locale.direction() == TextDirection::Rtl);
        }

        let product = self.config.product();
        self.rkeywords.clear();
        self.generated_by = locale.translate("Generated by %s", &product);
        self.rauthor = product;

        let size = match self.config.page_format {
            PageFormat::Custom { width, height } => validate_custom(width, height)?,
            named => named.dimensions(),
        }
        .oriented(self.config.orientation);
        self.page_width = size.width;
        self.page_height = size.height;

        log::debug!(
            "report set up: {} {:?} {:.2}x{:.2}pt rtl={}",
            self.config.page_format,
            self.config.orientation,
            size.width,
            size.height,
            self.is_rtl()
        );
        Ok(())
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_width, self.page_height)
    }

    pub fn margins(&self) -> Margins {
        self.config.margins
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl.unwrap_or(false)
    }

    pub fn processing(&self) -> ProcessingPhase {
        self.processing
    }

    /// Moves to `phase`. Backward moves fail only when ordering is enforced.
    pub fn set_processing(&mut self, phase: ProcessingPhase) -> Result<()> {
        if self.config.enforce_phase_order && phase < self.processing {
            return Err(ReportError::PhaseOrder {
                from: self.processing,
                to: phase,
            });
        }
        log::debug!("processing phase {} -> {}", self.processing, phase);
        self.processing = phase;
        Ok(())
    }

    /// Appends to the title; report parsers deliver character data in pieces.
    pub fn add_title(&mut self, text: &str) {
        self.title.push_str(text);
    }

    /// Appends to the description (the document subject).
    pub fn add_description(&mut self, text: &str) {
        self.rsubject.push_str(text);
    }

    pub fn add_keywords(&mut self, text: &str) {
        self.rkeywords.push_str(text);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subject(&self) -> &str {
        &self.rsubject
    }

    pub fn author(&self) -> &str {
        &self.rauthor
    }

    pub fn keywords(&self) -> &str {
        &self.rkeywords
    }

    pub fn generated_by(&self) -> &str {
        &self.generated_by
    }

    pub fn show_generated_by(&self) -> bool {
        self.config.show_generated_by
    }

    pub fn add_style(&mut self, style: Style) {
        self.styles.add(style);
    }

    pub fn get_style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Text attributes used where no style applies.
    pub fn default_text_style(&self) -> TextStyle {
        Style::new("")
            .with_font(self.config.default_font.as_str())
            .with_size(self.config.default_font_size)
            .text_style(None)
    }

    pub fn create_cell(&self, width: f64, height: f64, style: &str) -> Cell {
        Cell::new(width, height, style)
    }

    pub fn create_text_box(&self, width: f64, height: f64, style: &str) -> TextBox {
        TextBox::new(width, height, style)
    }

    pub fn create_text(&self, style: &str, color: Option<Rgb>) -> Text {
        Text::new(style, color)
    }

    pub fn create_html(&self, tag: &str, attributes: Vec<(String, String)>) -> Html {
        Html::new(tag, attributes)
    }

    pub fn create_line(
        &self,
        x1: Option<f64>,
        y1: Option<f64>,
        x2: Option<f64>,
        y2: Option<f64>,
    ) -> Line {
        Line::new(x1, y1, x2, y2)
    }

    /// An image read from `path` at render time.
    pub fn create_image(&self, path: impl Into<PathBuf>, width: f64, height: f64) -> Image {
        Image::new(ImageSource::FilePath(path.into())).with_size(width, height)
    }

    /// An image resolved through the media store at render time.
    pub fn create_image_from_object(&self, media: MediaFile, width: f64, height: f64) -> Image {
        Image::new(ImageSource::MediaReference(media)).with_size(width, height)
    }

    pub fn create_footnote(&self, style: &str) -> Footnote {
        Footnote::new(style)
    }

    /// The document's page header, created on first use.
    pub fn create_page_header(&mut self) -> &mut PageHeader {
        self.page_header.get_or_insert_with(PageHeader::new)
    }

    /// Adds an element tagged with the current phase. Elements added during
    /// the page-header phase go into the page header.
    pub fn add_element(&mut self, element: impl Into<DrawableElement>) {
        let element = element.into();
        if self.processing == ProcessingPhase::PageHeader {
            self.create_page_header().add_element(element);
            return;
        }
        self.elements.push(PhasedElement {
            phase: self.processing,
            element,
        });
    }

    /// Drops every element created in the header phase.
    pub fn clear_header(&mut self) {
        self.elements
            .retain(|phased| phased.phase != ProcessingPhase::Header);
    }

    pub fn elements(&self) -> &[PhasedElement] {
        &self.elements
    }

    /// Elements of one phase in creation order.
    pub fn elements_in(&self, phase: ProcessingPhase) -> impl Iterator<Item = &DrawableElement> {
        self.elements
            .iter()
            .filter(move |phased| phased.phase == phase)
            .map(|phased| &phased.element)
    }

    pub fn page_header(&self) -> Option<&PageHeader> {
        self.page_header.as_ref()
    }

    /// Every image source the render will need, page header included.
    pub fn images(&self) -> impl Iterator<Item = &ImageSource> {
        let header = self
            .page_header
            .iter()
            .flat_map(|header| header.elements().iter());
        self.elements
            .iter()
            .map(|phased| &phased.element)
            .chain(header)
            .filter_map(DrawableElement::image_source)
    }
}

/// The element-factory contract shared by the output backends.
///
/// Implementors own a [`ReportDocument`] and provide [`Report::run`]; every
/// other operation forwards to the document.
pub trait Report {
    fn document(&self) -> &ReportDocument;

    fn document_mut(&mut self) -> &mut ReportDocument;

    /// Lays the document out and writes the finished output to `writer`.
    fn run(&mut self, writer: &mut dyn Write) -> Result<()>;

    fn setup(&mut self, locale: &dyn Localizer) -> Result<()> {
        self.document_mut().setup(locale)
    }

    fn set_processing(&mut self, phase: ProcessingPhase) -> Result<()> {
        self.document_mut().set_processing(phase)
    }

    fn add_title(&mut self, text: &str) {
        self.document_mut().add_title(text);
    }

    fn add_description(&mut self, text: &str) {
        self.document_mut().add_description(text);
    }

    fn add_style(&mut self, style: Style) {
        self.document_mut().add_style(style);
    }

    fn get_style(&self, name: &str) -> Option<&Style> {
        self.document().get_style(name)
    }

    fn create_cell(&self, width: f64, height: f64, style: &str) -> Cell {
        self.document().create_cell(width, height, style)
    }

    fn create_text_box(&self, width: f64, height: f64, style: &str) -> TextBox {
        self.document().create_text_box(width, height, style)
    }

    fn create_text(&self, style: &str, color: Option<Rgb>) -> Text {
        self.document().create_text(style, color)
    }

    fn create_html(&self, tag: &str, attributes: Vec<(String, String)>) -> Html {
        self.document().create_html(tag, attributes)
    }

    fn create_line(
        &self,
        x1: Option<f64>,
        y1: Option<f64>,
        x2: Option<f64>,
        y2: Option<f64>,
    ) -> Line {
        self.document().create_line(x1, y1, x2, y2)
    }

    fn create_image(&self, path: PathBuf, width: f64, height: f64) -> Image {
        self.document().create_image(path, width, height)
    }

    fn create_image_from_object(&self, media: MediaFile, width: f64, height: f64) -> Image {
        self.document().create_image_from_object(media, width, height)
    }

    fn create_footnote(&self, style: &str) -> Footnote {
        self.document().create_footnote(style)
    }

    fn create_page_header(&mut self) -> &mut PageHeader {
        self.document_mut().create_page_header()
    }

    fn add_element(&mut self, element: DrawableElement) {
        self.document_mut().add_element(element);
    }

    fn clear_header(&mut self) {
        self.document_mut().clear_header();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::StaticLocale;

    fn ready(config: ReportConfig) -> ReportDocument {
        let mut document = ReportDocument::new(config);
        document.setup(&StaticLocale::new()).expect("setup");
        document
    }

    #[test]
    fn phase_codes_parse() {
        assert_eq!(ProcessingPhase::from_code("ph"), Some(ProcessingPhase::PageHeader));
        assert_eq!(ProcessingPhase::from_code("F"), Some(ProcessingPhase::Footer));
        assert_eq!(ProcessingPhase::from_code("X"), None);
    }

    #[test]
    fn setup_builds_generated_by_and_author() {
        let document = ready(ReportConfig::new().with_product("webtrees", "2.1.0"));
        assert_eq!(document.generated_by(), "Generated by webtrees 2.1.0");
        assert_eq!(document.author(), "webtrees 2.1.0");
    }

    #[test]
    fn setup_rejects_small_custom_sizes() {
        let mut document = ReportDocument::new(ReportConfig::new().with_custom_size(9.5, 300.0));
        let err = document.setup(&StaticLocale::new()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidGeometry {
                dimension: "customwidth",
                ..
            }
        ));
    }

    #[test]
    fn landscape_swaps_custom_sizes_too() {
        let document = ready(
            ReportConfig::new()
                .with_custom_size(200.0, 300.0)
                .with_orientation(Orientation::Landscape),
        );
        assert_eq!((document.page_width(), document.page_height()), (300.0, 200.0));
    }

    #[test]
    fn direction_is_only_taken_once() {
        let mut document = ReportDocument::new(ReportConfig::new());
        document
            .setup(&StaticLocale::new().with_direction(TextDirection::Rtl))
            .expect("setup");
        document.setup(&StaticLocale::new()).expect("setup");
        assert!(document.is_rtl());
    }

    #[test]
    fn setup_clears_keywords() {
        let mut document = ReportDocument::new(ReportConfig::new());
        document.add_keywords("census");
        document.setup(&StaticLocale::new()).expect("setup");
        assert_eq!(document.keywords(), "");
    }

    #[test]
    fn phases_move_freely_by_default() {
        let mut document = ready(ReportConfig::new());
        document.set_processing(ProcessingPhase::Footer).expect("forward");
        document.set_processing(ProcessingPhase::Header).expect("backward");
        assert_eq!(document.processing(), ProcessingPhase::Header);
    }

    #[test]
    fn enforced_order_rejects_backward_moves() {
        let mut document = ready(ReportConfig::new().enforce_phase_order(true));
        document.set_processing(ProcessingPhase::Body).expect("forward");
        let err = document
            .set_processing(ProcessingPhase::PageHeader)
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::PhaseOrder {
                from: ProcessingPhase::Body,
                to: ProcessingPhase::PageHeader
            }
        ));
        assert_eq!(document.processing(), ProcessingPhase::Body);
        document.set_processing(ProcessingPhase::Body).expect("same phase");
    }

    #[test]
    fn elements_are_tagged_and_page_header_elements_are_routed() {
        let mut document = ready(ReportConfig::new());
        document.add_element(document.create_cell(10.0, 10.0, "h"));
        document.set_processing(ProcessingPhase::PageHeader).expect("phase");
        document.add_element(document.create_cell(10.0, 10.0, "ph"));
        document.set_processing(ProcessingPhase::Body).expect("phase");
        document.add_element(document.create_text("b", None));

        assert_eq!(document.elements().len(), 2);
        assert_eq!(document.elements()[0].phase, ProcessingPhase::Header);
        assert_eq!(document.elements()[1].phase, ProcessingPhase::Body);
        assert_eq!(document.page_header().map(|h| h.elements().len()), Some(1));
    }

    #[test]
    fn clear_header_keeps_other_phases() {
        let mut document = ready(ReportConfig::new());
        document.add_element(document.create_cell(10.0, 10.0, "h"));
        document.set_processing(ProcessingPhase::Footer).expect("phase");
        document.add_element(document.create_cell(10.0, 10.0, "f"));
        document.clear_header();
        assert_eq!(document.elements().len(), 1);
        assert_eq!(document.elements()[0].phase, ProcessingPhase::Footer);
    }

    #[test]
    fn images_include_the_page_header() {
        let mut document = ready(ReportConfig::new());
        document.set_processing(ProcessingPhase::PageHeader).expect("phase");
        document.add_element(document.create_image("logo.png", 20.0, 0.0));
        document.set_processing(ProcessingPhase::Body).expect("phase");
        let media = MediaFile::new("M1", "photo.jpg");
        document.add_element(document.create_image_from_object(media.clone(), 0.0, 40.0));

        let sources: Vec<_> = document.images().cloned().collect();
        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&ImageSource::MediaReference(media)));
        assert!(sources.contains(&ImageSource::FilePath("logo.png".into())));
    }
}
