//! PDF page source using lopdf.

use std::borrow::Cow;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::detect_format_from_path;
use crate::error::Result;

use super::PageSource;

/// Reads page text from a PDF, one page at a time.
///
/// Pages whose text cannot be extracted are reported as absent and logged.
pub struct PdfPageSource {
    doc: LopdfDocument,
    page_numbers: Vec<u32>,
}

impl PdfPageSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("PDF is encrypted; page text may be unavailable");
        }
        // get_pages is keyed by 1-indexed page number, already in order
        let page_numbers = doc.get_pages().keys().copied().collect();
        Self { doc, page_numbers }
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Option<Cow<'_, str>> {
        let page_num = *self.page_numbers.get(index)?;
        match self.doc.extract_text(&[page_num]) {
            Ok(text) => Some(Cow::Owned(text)),
            Err(e) => {
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for PdfPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfPageSource")
            .field("pages", &self.page_numbers.len())
            .finish()
    }
}
