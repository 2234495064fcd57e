//! Segmentation types: content window, blocks and output units.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page range believed to hold the real question or answer material.
///
/// `end` is exclusive; `None` means the window runs to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentWindow {
    /// First content page (0-based)
    pub start: usize,

    /// Exclusive end page, or unbounded
    pub end: Option<usize>,
}

impl ContentWindow {
    /// Create a window, discarding an end that does not lie after `start`.
    pub fn new(start: usize, end: Option<usize>) -> Self {
        let end = end.filter(|&e| e > start);
        Self { start, end }
    }

    /// The whole document.
    pub fn whole() -> Self {
        Self::default()
    }

    /// Check if the window has no detected end.
    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    /// Concrete page range for a document with `page_count` pages.
    pub fn range(&self, page_count: usize) -> Range<usize> {
        let end = self.end.map_or(page_count, |e| e.min(page_count));
        let start = self.start.min(end);
        start..end
    }
}

impl std::fmt::Display for ContentWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}..{})", self.start, end),
            None => write!(f, "[{}..)", self.start),
        }
    }
}

/// Kind of material being segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// Question papers; visual-dependency filtering applies
    #[default]
    Questions,
    /// Answer keys / marking schemes; every block is kept
    Solutions,
}

impl Material {
    /// JSON key used for a unit's text in rendered output.
    pub fn text_key(&self) -> &'static str {
        match self {
            Material::Questions => "text",
            Material::Solutions => "solution",
        }
    }
}

/// A numbered block found by the segmenter, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Number parsed from the block's leading marker
    pub sequence_number: u32,

    /// Block text without its leading marker
    pub text: String,
}

impl Block {
    /// Create a new block.
    pub fn new(sequence_number: u32, text: impl Into<String>) -> Self {
        Self {
            sequence_number,
            text: text.into(),
        }
    }

    /// Append continuation text separated by a single space.
    pub fn absorb(&mut self, continuation: &str) {
        let continuation = continuation.trim();
        if continuation.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(continuation);
    }
}

/// A block that survived classification; the engine's output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentUnit {
    /// Question number
    #[serde(rename = "question_number")]
    pub sequence_number: u32,

    /// Question (or solution) text
    #[serde(alias = "solution")]
    pub text: String,
}

impl From<Block> for SegmentUnit {
    fn from(block: Block) -> Self {
        Self {
            sequence_number: block.sequence_number,
            text: block.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_discards_inverted_end() {
        let window = ContentWindow::new(5, Some(3));
        assert!(window.is_unbounded());
        assert_eq!(window.range(8), 5..8);

        let window = ContentWindow::new(2, Some(2));
        assert!(window.is_unbounded());
    }

    #[test]
    fn test_window_range_clamps() {
        assert_eq!(ContentWindow::new(1, Some(10)).range(4), 1..4);
        assert_eq!(ContentWindow::new(6, None).range(4), 4..4);
        assert_eq!(ContentWindow::whole().range(0), 0..0);
    }

    #[test]
    fn test_window_display() {
        assert_eq!(ContentWindow::new(0, Some(3)).to_string(), "[0..3)");
        assert_eq!(ContentWindow::new(2, None).to_string(), "[2..)");
    }

    #[test]
    fn test_block_absorb() {
        let mut block = Block::new(1, "Describe soil pH.");
        block.absorb("  (b) Name a test. ");
        block.absorb("");
        assert_eq!(block.text, "Describe soil pH. (b) Name a test.");

        let mut empty = Block::new(2, "");
        empty.absorb("tail");
        assert_eq!(empty.text, "tail");
    }

    #[test]
    fn test_unit_serde_names() {
        let unit = SegmentUnit {
            sequence_number: 7,
            text: "Outline silage making.".to_string(),
        };
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, r#"{"question_number":7,"text":"Outline silage making."}"#);

        let parsed: SegmentUnit =
            serde_json::from_str(r#"{"question_number":3,"solution":"Lime the field."}"#).unwrap();
        assert_eq!(parsed.sequence_number, 3);
        assert_eq!(parsed.text, "Lime the field.");
    }
}
