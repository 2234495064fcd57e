//! Content window detection.
//!
//! Exam papers open with cover and instruction pages and often close with a
//! "blank page" or an acknowledgements page. The locator finds the page range
//! between them from raw page text, before any cleanup.

use regex::Regex;

use super::SegmenterConfig;
use crate::error::{Error, Result};
use crate::model::ContentWindow;
use crate::source::PageSource;

/// Finds the first content page and the trailing boilerplate.
#[derive(Debug, Clone)]
pub struct WindowLocator {
    start: Vec<Regex>,
    end: Vec<Regex>,
}

impl WindowLocator {
    /// Compile the configured page signatures.
    pub fn new(config: &SegmenterConfig) -> Result<Self> {
        Ok(Self {
            start: compile_all(&config.start_signatures)?,
            end: compile_all(&config.end_signatures)?,
        })
    }

    /// Locate the content window of `source`.
    ///
    /// The forward scan stops at the first page matching a start signature
    /// (page 0 if none does). The backward scan stops at the last page
    /// matching an end signature and sets the exclusive end just after it.
    /// An end that does not lie after the start is dropped.
    pub fn locate<S: PageSource + ?Sized>(&self, source: &S) -> ContentWindow {
        let page_count = source.page_count();

        let start = (0..page_count)
            .find(|&i| page_matches(source, i, &self.start))
            .unwrap_or(0);

        let end = (0..page_count)
            .rev()
            .find(|&i| page_matches(source, i, &self.end))
            .map(|i| i + 1);

        if let Some(e) = end {
            if e <= start {
                log::debug!(
                    "Ignoring end page {} at or before start page {}",
                    e,
                    start
                );
            }
        }

        ContentWindow::new(start, end)
    }

    /// Check if a page's text carries a content-start signature.
    pub fn is_start_page(&self, text: &str) -> bool {
        self.start.iter().any(|re| re.is_match(text))
    }

    /// Check if a page's text carries a content-end signature.
    pub fn is_end_page(&self, text: &str) -> bool {
        self.end.iter().any(|re| re.is_match(text))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(Error::from))
        .collect()
}

fn page_matches<S: PageSource + ?Sized>(source: &S, index: usize, patterns: &[Regex]) -> bool {
    source
        .page_text(index)
        .map_or(false, |text| patterns.iter().any(|re| re.is_match(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn locator() -> WindowLocator {
        WindowLocator::new(&SegmenterConfig::default()).unwrap()
    }

    #[test]
    fn test_start_signatures() {
        let locator = locator();
        assert!(locator.is_start_page("Cover\nQUESTION 1 (60 marks)"));
        assert!(locator.is_start_page("Instructions\n  1. Soil is a mixture"));
        assert!(locator.is_start_page("Q1 Define pH."));
        assert!(locator.is_start_page("q 1 (a)"));
        assert!(!locator.is_start_page("Question 10 is optional"));
        assert!(!locator.is_start_page("Answer all questions."));
    }

    #[test]
    fn test_locate_start_and_end() {
        let doc = Document::from_texts([
            "Leaving Certificate Examination",
            "Instructions",
            "Question 1 Define pH.",
            "Question 2 Name a breed.",
            "BLANK PAGE",
        ]);
        let window = locator().locate(&doc);
        assert_eq!(window, ContentWindow::new(2, Some(5)));
        assert_eq!(window.range(doc.page_count()), 2..5);
    }

    #[test]
    fn test_no_signatures_is_whole_document() {
        let doc = Document::from_texts(["cover", "body"]);
        let window = locator().locate(&doc);
        assert_eq!(window.start, 0);
        assert!(window.is_unbounded());
    }

    #[test]
    fn test_inverted_end_becomes_unbounded() {
        let doc = Document::from_texts([
            "Acknowledgements",
            "Instructions",
            "Cover notes",
            "Question 1 Define pH.",
        ]);
        let window = locator().locate(&doc);
        assert_eq!(window.start, 3);
        assert!(window.is_unbounded());
        assert_eq!(window.range(doc.page_count()), 3..4);
    }

    #[test]
    fn test_backward_scan_takes_last_end_page() {
        let doc = Document::from_texts([
            "Question 1 Define pH.",
            "BLANK PAGE",
            "Question 2 Name a breed.",
            "Acknowledgements",
        ]);
        assert_eq!(locator().locate(&doc).end, Some(4));
    }

    #[test]
    fn test_absent_pages_never_match() {
        let doc = Document::from_page_texts(vec![None, Some("Question 1 x"), None]);
        let window = locator().locate(&doc);
        assert_eq!(window, ContentWindow::new(1, None));
    }

    #[test]
    fn test_empty_document() {
        let window = locator().locate(&Document::new());
        assert_eq!(window, ContentWindow::whole());
    }

    #[test]
    fn test_invalid_signature_is_config_error() {
        let config = SegmenterConfig::new().with_start_signatures(["(question"]);
        assert!(matches!(
            WindowLocator::new(&config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
