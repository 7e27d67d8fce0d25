//! Report engine for genealogy reports.
//!
//! A report is assembled as a [`ReportDocument`]: page geometry, a table of
//! named styles and drawable elements grouped by processing phase (header,
//! page header, body, footer). Layout is shared; [`PdfReport`] and
//! [`HtmlReport`] paint the laid-out pages in their own formats.

pub mod document;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod html;
pub mod layout;
pub mod locale;
pub mod media;
pub mod pdf;
pub mod richtext;
pub mod style;

pub use document::{ProcessingPhase, Report, ReportConfig, ReportDocument};
pub use elements::DrawableElement;
pub use error::{ReportError, Result};
pub use geometry::{Margins, Orientation, PageFormat, PageSize};
pub use html::HtmlReport;
pub use locale::{Localizer, StaticLocale, TextDirection};
pub use media::{FilesystemMediaStore, MediaFile, MediaStore, NoMedia};
pub use pdf::PdfReport;
pub use style::{FontStyle, Rgb, Style, StyleFallback, StyleTable};
