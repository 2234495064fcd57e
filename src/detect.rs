//! Input format detection.
//!
//! Page sources are chosen from the first bytes of the input: a PDF header,
//! a JSON array of page strings, or plain UTF-8 text with form-feed page breaks.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Detected input format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    /// A PDF file with its header version (e.g., "1.7")
    Pdf {
        /// PDF version from the header
        version: String,
    },
    /// A JSON array with one entry (string or null) per page
    JsonPages,
    /// Plain text, pages separated by form feed characters
    PlainText,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf { version } => write!(f, "PDF {}", version),
            SourceFormat::JsonPages => write!(f, "JSON pages"),
            SourceFormat::PlainText => write!(f, "plain text"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// How many leading bytes are inspected.
const SNIFF_LEN: usize = 512;

/// Detect the input format of a file.
///
/// # Example
/// ```no_run
/// use exam_segmenter::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("paper_2015.pdf").unwrap();
/// println!("Input: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the input format from the leading bytes of the input.
///
/// # Returns
/// * `Ok(SourceFormat)` for a PDF header, a JSON array or UTF-8 text
///   (empty input is text with no pages)
/// * `Err(Error::UnknownFormat)` for binary non-PDF input
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.is_empty() {
        return Ok(SourceFormat::PlainText);
    }

    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
            return Err(Error::UnknownFormat("truncated PDF header".to_string()));
        }
        let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if !is_valid_version(&version) {
            return Err(Error::PdfParse(format!("unsupported PDF version {}", version)));
        }
        return Ok(SourceFormat::Pdf { version });
    }

    if !is_probably_text(data) {
        return Err(Error::UnknownFormat("binary data".to_string()));
    }

    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[') => Ok(SourceFormat::JsonPages),
        _ => Ok(SourceFormat::PlainText),
    }
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// UTF-8 check that tolerates a multi-byte sequence cut off by the sniff window.
fn is_probably_text(data: &[u8]) -> bool {
    if data.contains(&0) {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(SourceFormat::Pdf { .. }))
}
