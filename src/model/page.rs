//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page of a paginated document.
///
/// Absent text is a valid state (a scanned page with no text layer, or a page
/// the extractor could not read); it contributes no lines and is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,

    /// Raw extracted text, if any
    pub text: Option<String>,
}

impl Page {
    /// Create a page with text.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: Some(text.into()),
        }
    }

    /// Create a page without extractable text.
    pub fn blank(index: usize) -> Self {
        Self { index, text: None }
    }

    /// Raw text as a string slice.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Check if the page has no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new() {
        let page = Page::new(3, "Question 4");
        assert_eq!(page.index, 3);
        assert_eq!(page.text(), Some("Question 4"));
        assert!(!page.is_empty());
    }

    #[test]
    fn test_blank_page() {
        assert!(Page::blank(0).is_empty());
        assert!(Page::new(0, "  \n ").is_empty());
    }
}
