//! PDF output through genpdf.
//!
//! Pages are laid out by [`crate::layout`] and then painted one canvas per
//! page: the page chrome (header, page header, footer) through the page
//! decorator, the body as a document element followed by a page break.

mod builder;
mod canvas;
pub mod fonts;
mod info;

use std::io::Write;
use std::rc::Rc;

use genpdf::elements::PageBreak;
use genpdf::{Mm, Size};

use crate::document::{Report, ReportDocument};
use crate::elements::ImageCache;
use crate::error::Result;
use crate::geometry::{pt_to_mm, PageSize};
use crate::layout::{LayoutEngine, Placed, StandardMetrics};
use crate::media::{MediaStore, NoMedia};

pub use builder::DocumentBuilder;
pub use canvas::PageCanvas;
pub use info::{apply_document_info, DocumentInfo};

fn paper_size(size: PageSize) -> Size {
    Size::new(
        Mm::from(printpdf::Mm(pt_to_mm(size.width))),
        Mm::from(printpdf::Mm(pt_to_mm(size.height))),
    )
}

/// Renders a report as a PDF file.
pub struct PdfReport {
    document: ReportDocument,
    media: Box<dyn MediaStore>,
}

impl PdfReport {
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

    /// Lays the document out and returns the PDF bytes.
    pub fn render(&self) -> Result<Vec<u8>> {
        let doc = &self.document;
        let images = Rc::new(ImageCache::load(doc.images(), self.media.as_ref())?);
        let pages = LayoutEngine::new(doc, &StandardMetrics)
            .with_images(&images)
            .layout();

        let font_family = fonts::default_font_family()?;

        let chrome: Rc<Vec<Vec<Placed>>> =
            Rc::new(pages.iter().map(|page| page.chrome.clone()).collect());
        let chrome_images = Rc::clone(&images);
        let mut document = DocumentBuilder::new()
            .with_paper_size(paper_size(doc.page_size()))
            .with_title(doc.title())
            .with_chrome(move |page| {
                let items = page
                    .checked_sub(1)
                    .and_then(|index| chrome.get(index))
                    .cloned()
                    .unwrap_or_default();
                PageCanvas::new(items, Rc::clone(&chrome_images))
            })
            .build(font_family);

        let total = pages.len();
        for (index, page) in pages.into_iter().enumerate() {
            if index > 0 {
                document.push(PageBreak::new());
            }
            document.push(PageCanvas::new(page.body, Rc::clone(&images)));
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        log::debug!("rendered {total} page(s), {} bytes", bytes.len());

        apply_document_info(&bytes, &DocumentInfo::from_document(doc))
    }
}

impl Report for PdfReport {
    fn document(&self) -> &ReportDocument {
        &self.document
    }

    fn document_mut(&mut self) -> &mut ReportDocument {
        &mut self.document
    }

    fn run(&mut self, writer: &mut dyn Write) -> Result<()> {
        let bytes = self.render()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}
