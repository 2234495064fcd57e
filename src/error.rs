//! Error types for exam-segmenter.
//!
//! The segmentation core itself never fails: absent pages, missing markers and
//! out-of-range numbers all degrade to an empty or shorter result. These
//! errors cover the surfaces around it (reading inputs, configuration and
//! output rendering).

use std::io;
use thiserror::Error;

/// Result type alias for exam-segmenter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around document segmentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor a supported text layout.
    #[error("Unknown input format: {0}")]
    UnknownFormat(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The segmenter configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while rendering the segmentation result.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
