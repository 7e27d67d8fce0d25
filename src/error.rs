//! Error taxonomy shared by the document model and both output backends.

use std::io;

use thiserror::Error;

use crate::document::ProcessingPhase;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that abort a report render.
///
/// Style lookups that miss are deliberately absent here: they fall back to
/// the first registered style instead of failing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A custom page dimension is smaller than the 10pt minimum.
    #[error("invalid page geometry: {dimension} must be at least 10pt, got {value}pt")]
    InvalidGeometry {
        /// Report-definition attribute that carried the bad value.
        dimension: &'static str,
        /// The rejected value in points.
        value: f64,
    },

    /// An image element could not be resolved into decodable bytes.
    #[error("image source {source_name} could not be loaded: {reason}")]
    MissingImageSource {
        /// File path or media identifier of the image.
        source_name: String,
        /// Why loading or decoding failed.
        reason: String,
    },

    /// A backward phase transition while ordering is enforced.
    #[error("processing phase cannot move from {from:?} back to {to:?}")]
    PhaseOrder {
        /// Phase the document was in.
        from: ProcessingPhase,
        /// Phase that was requested.
        to: ProcessingPhase,
    },

    /// No usable font family was found for PDF output.
    #[error("font error: {0}")]
    Font(String),

    /// genpdf failed while laying out or writing the document.
    #[error("PDF rendering failed: {0}")]
    Render(#[from] genpdf::error::Error),

    /// lopdf failed while post-processing the rendered bytes.
    #[error("PDF post-processing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReportError {
    pub(crate) fn missing_image(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::MissingImageSource {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
