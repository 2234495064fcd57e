//! Page sources: where per-page raw text comes from.
//!
//! The engine only ever asks two things of a source: how many pages there
//! are, and the text of one page (which may be absent). Extraction failures
//! degrade to absent text so a single bad page never aborts a run.

#[cfg(feature = "pdf")]
mod pdf;
mod text;

#[cfg(feature = "pdf")]
pub use pdf::PdfPageSource;
pub use text::{document_from_json, document_from_text, PAGE_BREAK};

use std::borrow::Cow;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use crate::model::Document;

/// A paginated document the engine can read page by page.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw text of the page at `index` (0-based), or `None` when the page has
    /// no extractable text or `index` is out of range.
    fn page_text(&self, index: usize) -> Option<Cow<'_, str>>;
}

impl PageSource for Document {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Option<Cow<'_, str>> {
        self.pages
            .get(index)
            .and_then(|page| page.text.as_deref())
            .map(Cow::Borrowed)
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, index: usize) -> Option<Cow<'_, str>> {
        (**self).page_text(index)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, index: usize) -> Option<Cow<'_, str>> {
        (**self).page_text(index)
    }
}

/// Open a file as a page source, choosing the reader from its leading bytes.
///
/// # Example
///
/// ```no_run
/// use exam_segmenter::source::{open_path, PageSource};
///
/// let source = open_path("paper_2015.txt").unwrap();
/// println!("Pages: {}", source.page_count());
/// ```
pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Box<dyn PageSource + Send + Sync>> {
    let data = std::fs::read(path.as_ref())?;
    open_bytes(&data)
}

/// Open in-memory input as a page source.
pub fn open_bytes(data: &[u8]) -> Result<Box<dyn PageSource + Send + Sync>> {
    match detect_format_from_bytes(data)? {
        SourceFormat::Pdf { version } => open_pdf_bytes(data, &version),
        SourceFormat::JsonPages => {
            let text = decode_utf8(data)?;
            Ok(Box::new(document_from_json(&text)?))
        }
        SourceFormat::PlainText => {
            let text = decode_utf8(data)?;
            Ok(Box::new(document_from_text(&text)))
        }
    }
}

#[cfg(feature = "pdf")]
fn open_pdf_bytes(data: &[u8], version: &str) -> Result<Box<dyn PageSource + Send + Sync>> {
    log::debug!("Opening PDF {} input ({} bytes)", version, data.len());
    Ok(Box::new(PdfPageSource::from_bytes(data)?))
}

#[cfg(not(feature = "pdf"))]
fn open_pdf_bytes(_data: &[u8], version: &str) -> Result<Box<dyn PageSource + Send + Sync>> {
    Err(Error::UnknownFormat(format!(
        "PDF {} input requires the `pdf` feature",
        version
    )))
}

fn decode_utf8(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|e| Error::TextExtract(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_page_source() {
        let doc = Document::from_page_texts(vec![Some("Question 1"), None]);
        assert_eq!(PageSource::page_count(&doc), 2);
        assert_eq!(doc.page_text(0).as_deref(), Some("Question 1"));
        assert!(doc.page_text(1).is_none());
        assert!(doc.page_text(9).is_none());
    }

    #[test]
    fn test_open_bytes_plain_text() {
        let source = open_bytes("Cover\u{c}Question 1 Define pH.".as_bytes()).unwrap();
        assert_eq!(source.page_count(), 2);
        assert_eq!(source.page_text(1).as_deref(), Some("Question 1 Define pH."));
    }

    #[test]
    fn test_open_bytes_json_pages() {
        let source = open_bytes(br#"["Cover", null, "Question 1"]"#).unwrap();
        assert_eq!(source.page_count(), 3);
        assert!(source.page_text(1).is_none());
    }

    #[test]
    fn test_open_bytes_rejects_binary() {
        assert!(open_bytes(&[0x00, 0x9F, 0x92, 0x96]).is_err());
    }
}
