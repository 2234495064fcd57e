//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// An in-memory paginated document.
///
/// Pages are stored in order and indexed from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in the document
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from per-page text, `None` marking a page without text.
    ///
    /// # Example
    ///
    /// ```
    /// use exam_segmenter::Document;
    ///
    /// let doc = Document::from_page_texts(vec![Some("Question 1 Define pH."), None]);
    /// assert_eq!(doc.page_count(), 2);
    /// ```
    pub fn from_page_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page {
                index,
                text: text.map(Into::into),
            })
            .collect();
        Self { pages }
    }

    /// Build a document where every page has text.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_page_texts(texts.into_iter().map(Some))
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by index (0-based).
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Append a page, re-indexing it to the end of the document.
    pub fn add_page(&mut self, mut page: Page) {
        page.index = self.pages.len();
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
