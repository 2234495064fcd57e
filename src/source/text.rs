//! Text-based page sources.
//!
//! `pdftotext` and most OCR tools emit one form feed per page break, so a
//! plain text dump keeps its pagination. A JSON array of page strings (with
//! `null` for pages without text) is accepted as well.

use crate::error::{Error, Result};
use crate::model::Document;

/// Page break character in plain text dumps.
pub const PAGE_BREAK: char = '\u{c}';

/// Split a plain text dump into pages on form feeds.
///
/// A trailing form feed (as written after the last page by `pdftotext`) does
/// not create an extra empty page.
pub fn document_from_text(text: &str) -> Document {
    if text.is_empty() {
        return Document::new();
    }
    let body = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
    Document::from_texts(body.split(PAGE_BREAK))
}

/// Parse a JSON array of page texts; `null` entries become pages without text.
pub fn document_from_json(json: &str) -> Result<Document> {
    let pages: Vec<Option<String>> = serde_json::from_str(json).map_err(|e| {
        Error::TextExtract(format!("expected a JSON array of page strings: {}", e))
    })?;
    Ok(Document::from_page_texts(pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_feed_split() {
        let doc = document_from_text("cover\u{c}Question 1\nDefine pH.\u{c}BLANK PAGE\u{c}");
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.pages[1].text(), Some("Question 1\nDefine pH."));
        assert_eq!(doc.pages[2].text(), Some("BLANK PAGE"));
    }

    #[test]
    fn test_text_without_breaks_is_one_page() {
        let doc = document_from_text("Question 1 Define pH.");
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_empty_text_has_no_pages() {
        assert!(document_from_text("").is_empty());
    }

    #[test]
    fn test_json_pages() {
        let doc = document_from_json(r#"["a", null, "c"]"#).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[1].text.is_none());
    }

    #[test]
    fn test_json_pages_rejects_objects() {
        let result = document_from_json(r#"{"pages": []}"#);
        assert!(matches!(result, Err(Error::TextExtract(_))));
    }
}
