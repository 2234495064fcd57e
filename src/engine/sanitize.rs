//! Per-line cleanup of raw page text.
//!
//! Boilerplate lines (headers, footers, level banners) are dropped outright,
//! residual instructional phrases are cut out of the lines that remain, and
//! lines repeated on the same page are collapsed to their first occurrence.

use std::collections::HashSet;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::events::{DropReason, EventSink, NullSink, SegmentEvent};
use super::SegmenterConfig;
use crate::error::Result;
use crate::model::ContentWindow;
use crate::source::PageSource;

/// Separator between cleaned lines in the text stream, within and across pages.
pub const LINE_JOIN: &str = "\n";

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Line sanitizer built from a lexicon.
#[derive(Debug, Clone)]
pub struct LineSanitizer {
    /// Lowercased hard-skip entries, paired with the original spelling
    hard_skip: Vec<(String, String)>,
    soft_skip: Vec<Regex>,
    normalize_unicode: bool,
}

impl LineSanitizer {
    /// Build a sanitizer from the configured lexicon.
    pub fn new(config: &SegmenterConfig) -> Result<Self> {
        let hard_skip = config
            .lexicon
            .hard_skip
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| (entry.to_lowercase(), entry.clone()))
            .collect();

        let soft_skip = config
            .lexicon
            .soft_skip
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| Regex::new(&format!("(?i){}", regex::escape(entry))))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            hard_skip,
            soft_skip,
            normalize_unicode: config.normalize_unicode,
        })
    }

    /// Clean one page's text.
    ///
    /// Absent text yields no lines.
    pub fn clean_page(&self, text: Option<&str>) -> Vec<String> {
        self.clean_page_with_events(0, text, &mut NullSink)
    }

    /// Clean one page's text, reporting every removed line.
    pub fn clean_page_with_events(
        &self,
        page: usize,
        text: Option<&str>,
        sink: &mut dyn EventSink,
    ) -> Vec<String> {
        let Some(text) = text else {
            sink.emit(&SegmentEvent::PageEmpty { page });
            return Vec::new();
        };

        let text = if self.normalize_unicode {
            normalize(text)
        } else {
            text.to_string()
        };

        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for raw in text.lines() {
            if raw.trim().is_empty() {
                continue;
            }

            if let Some(entry) = self.hard_skip_entry(raw) {
                sink.emit(&SegmentEvent::LineDropped {
                    page,
                    line: raw.to_string(),
                    reason: DropReason::HardSkip {
                        entry: entry.to_string(),
                    },
                });
                continue;
            }

            let cleaned = self.excise(raw);

            // Excision can splice a hard-skip entry back together
            if let Some(entry) = self.hard_skip_entry(&cleaned) {
                sink.emit(&SegmentEvent::LineDropped {
                    page,
                    line: raw.to_string(),
                    reason: DropReason::HardSkip {
                        entry: entry.to_string(),
                    },
                });
                continue;
            }

            if cleaned.is_empty() {
                sink.emit(&SegmentEvent::LineDropped {
                    page,
                    line: raw.to_string(),
                    reason: DropReason::Empty,
                });
                continue;
            }

            if !seen.insert(cleaned.clone()) {
                sink.emit(&SegmentEvent::LineDropped {
                    page,
                    line: raw.to_string(),
                    reason: DropReason::Duplicate,
                });
                continue;
            }

            lines.push(cleaned);
        }

        sink.emit(&SegmentEvent::PageCleaned {
            page,
            kept: lines.len(),
        });
        lines
    }

    /// Clean every page in the window and concatenate the lines in page order.
    pub fn clean_pages<S: PageSource + ?Sized>(
        &self,
        source: &S,
        window: &ContentWindow,
        sink: &mut dyn EventSink,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        for page in window.range(source.page_count()) {
            let text = source.page_text(page);
            lines.extend(self.clean_page_with_events(page, text.as_deref(), sink));
        }
        lines
    }

    /// Return the first hard-skip entry contained in `line`, if any.
    fn hard_skip_entry(&self, line: &str) -> Option<&str> {
        let lower = line.to_lowercase();
        self.hard_skip
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, original)| original.as_str())
    }

    /// Remove every soft-skip phrase and collapse whitespace, repeating until
    /// nothing changes.
    fn excise(&self, line: &str) -> String {
        let mut current = collapse_whitespace(line);
        loop {
            let mut next = current.clone();
            for re in &self.soft_skip {
                next = re.replace_all(&next, "").into_owned();
            }
            let next = collapse_whitespace(&next);
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Join cleaned lines into the text stream fed to the segmenter.
pub fn join_lines(lines: &[String]) -> String {
    lines.join(LINE_JOIN)
}

fn normalize(text: &str) -> String {
    let mut result: String = text.nfc().collect();
    for (ligature, replacement) in LIGATURES {
        result = result.replace(ligature, replacement);
    }
    result
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Lexicon;
    use crate::model::Document;

    fn sanitizer() -> LineSanitizer {
        LineSanitizer::new(&SegmenterConfig::default()).unwrap()
    }

    #[test]
    fn test_hard_skip_drops_whole_line() {
        let lines = sanitizer().clean_page(Some(
            "Page 3 of 12\nQuestion 2 Name a dairy breed.\nSECTION A",
        ));
        assert_eq!(lines, vec!["Question 2 Name a dairy breed."]);
    }

    #[test]
    fn test_hard_skip_is_substring_match() {
        // "level" inside a longer word still drops the line
        let lines = sanitizer().clean_page(Some("Explain sea levels.\nKeep me."));
        assert_eq!(lines, vec!["Keep me."]);
    }

    #[test]
    fn test_soft_skip_excises_phrase() {
        let lines = sanitizer().clean_page(Some(
            "ANSWER   Lime raises soil pH\nAny three valid points: drainage, texture",
        ));
        assert_eq!(
            lines,
            vec!["Lime raises soil pH", ": drainage, texture"]
        );
    }

    #[test]
    fn test_line_emptied_by_excision_is_dropped() {
        let lines = sanitizer().clean_page(Some("Answer\n  other valid responses  \nLime"));
        assert_eq!(lines, vec!["Lime"]);
    }

    #[test]
    fn test_duplicates_removed_first_wins() {
        let lines = sanitizer().clean_page(Some("Define pH.\nName a breed.\nDefine  pH.\nName a breed."));
        assert_eq!(lines, vec!["Define pH.", "Name a breed."]);
    }

    #[test]
    fn test_absent_text_yields_nothing() {
        assert!(sanitizer().clean_page(None).is_empty());
        assert!(sanitizer().clean_page(Some("")).is_empty());
    }

    #[test]
    fn test_ligatures_expanded() {
        let lines = sanitizer().clean_page(Some("Identify the \u{FB01}gure"));
        assert_eq!(lines, vec!["Identify the figure"]);
    }

    #[test]
    fn test_excision_cannot_reassemble_hard_skip() {
        let lines = sanitizer().clean_page(Some("PaAnswerge 4"));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let sanitizer = sanitizer();
        let raw = "Leaving Certificate Examination\nQuestion 1   Answer the following.\n\
                   (a) Name two   soil types.\n(a) Name two soil types.\nPage 2";
        let once = sanitizer.clean_page(Some(raw));
        let twice = sanitizer.clean_page(Some(&join_lines(&once)));
        assert_eq!(once, twice);
        assert_eq!(
            once,
            vec!["Question 1 the following.", "(a) Name two soil types."]
        );
    }

    #[test]
    fn test_idempotent_with_spaced_phrases() {
        let sanitizer = sanitizer();
        let raw = "Any three  valid points\nLime raises pH\nother  valid responses\n\
                   Any  Answer three valid points";
        let once = sanitizer.clean_page(Some(raw));
        let twice = sanitizer.clean_page(Some(&join_lines(&once)));
        assert_eq!(once, vec!["Lime raises pH"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_lexicon_entries_ignored() {
        let mut lexicon = Lexicon::standard();
        lexicon.hard_skip.push(String::new());
        lexicon.soft_skip.push("  ".to_string());
        let config = SegmenterConfig::new().with_lexicon(lexicon);
        let sanitizer = LineSanitizer::new(&config).unwrap();
        assert_eq!(sanitizer.clean_page(Some("Define pH.")), vec!["Define pH."]);
    }

    #[test]
    fn test_clean_pages_reports_events() {
        let doc = Document::from_page_texts(vec![
            Some("Question 1 Define pH.\nPage 1"),
            None,
            Some("Question 2 Name a breed."),
        ]);
        let mut events: Vec<SegmentEvent> = Vec::new();
        let lines = sanitizer().clean_pages(&doc, &ContentWindow::whole(), &mut events);

        assert_eq!(lines, vec!["Question 1 Define pH.", "Question 2 Name a breed."]);
        assert!(events.contains(&SegmentEvent::PageEmpty { page: 1 }));
        assert!(events.iter().any(|e| matches!(
            e,
            SegmentEvent::LineDropped {
                page: 0,
                reason: DropReason::HardSkip { .. },
                ..
            }
        )));
    }

    #[test]
    fn test_clean_pages_respects_window() {
        let doc = Document::from_texts(["cover text", "Question 1 Define pH.", "tail"]);
        let lines = sanitizer().clean_pages(&doc, &ContentWindow::new(1, Some(2)), &mut NullSink);
        assert_eq!(lines, vec!["Question 1 Define pH."]);
    }
}
