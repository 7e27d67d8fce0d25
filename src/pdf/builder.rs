//! Document construction for PDF output.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style;
use genpdf::{self, Element, PageDecorator, Size};

type PageFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Builder for `genpdf::Document` instances that carry report page chrome.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    title: Option<String>,
    chrome: Option<Box<PageFactory>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Configures the element painted on every page before its body.
    ///
    /// The callback receives the 1-based page number.
    pub fn with_chrome<F, E>(mut self, chrome: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.chrome = Some(Box::new(move |page| {
            Box::new(chrome(page)) as Box<dyn Element>
        }));
        self
    }

    /// Builds a configured `genpdf::Document` using `font_family` as the
    /// default family.
    pub fn build(self, font_family: FontFamily<FontData>) -> genpdf::Document {
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }

        document.set_page_decorator(ChromeDecorator::new(self.chrome));
        document
    }
}

/// Paints the per-page chrome and hands the untouched page area to the body.
struct ChromeDecorator {
    page: usize,
    chrome: Option<Box<PageFactory>>,
}

impl ChromeDecorator {
    fn new(chrome: Option<Box<PageFactory>>) -> Self {
        Self { page: 0, chrome }
    }
}

impl PageDecorator for ChromeDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;

        if let Some(chrome) = &self.chrome {
            let mut element = chrome(self.page);
            let result = element.render(context, area.clone(), style)?;
            if result.has_more {
                return Err(Error::new(
                    format!("Page chrome of page {} does not fit on the page", self.page),
                    ErrorKind::PageSizeExceeded,
                ));
            }
        }

        Ok(area)
    }
}
