//! Visual-dependency classification.
//!
//! A question that refers to an image, a graph or a tick-box layout cannot be
//! answered from extracted text alone. Such blocks are flagged for skipping,
//! unless an exemption phrase shows the keyword is part of what the candidate
//! is asked to produce ("draw a labelled diagram").

use serde::Serialize;

use super::{KeywordExemption, SegmenterConfig};

/// Outcome of classifying one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipDecision {
    /// Whether the block should be dropped
    pub skip: bool,

    /// Keywords found in the text after exemptions, in lexicon order
    pub matched: Vec<String>,
}

impl SkipDecision {
    fn from_matches(matched: Vec<String>) -> Self {
        Self {
            skip: !matched.is_empty(),
            matched,
        }
    }
}

/// Keyword classifier over block text.
#[derive(Debug, Clone)]
pub struct SkipClassifier {
    keywords: Vec<String>,
    exemptions: Vec<KeywordExemption>,
}

impl SkipClassifier {
    /// Build a classifier from the configured visual keywords and exemptions.
    ///
    /// Keywords and phrases are trimmed and lowercased; blank entries are ignored.
    pub fn new(config: &SegmenterConfig) -> Self {
        let keywords = config
            .lexicon
            .visual_keywords
            .iter()
            .filter_map(|k| normalize_term(k))
            .collect();

        let exemptions = config
            .lexicon
            .exemptions
            .iter()
            .filter_map(|ex| {
                Some(KeywordExemption {
                    phrase: normalize_term(&ex.phrase)?,
                    neutralizes: normalize_term(&ex.neutralizes)?,
                })
            })
            .collect();

        Self {
            keywords,
            exemptions,
        }
    }

    /// Classify a block's text.
    pub fn classify(&self, text: &str) -> SkipDecision {
        let lower = text.to_lowercase();

        let neutralized: Vec<&str> = self
            .exemptions
            .iter()
            .filter(|ex| lower.contains(ex.phrase.as_str()))
            .map(|ex| ex.neutralizes.as_str())
            .collect();

        let matched = self
            .keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .filter(|k| !neutralized.contains(&k.as_str()))
            .cloned()
            .collect();

        SkipDecision::from_matches(matched)
    }

    /// Shorthand for `classify(text).skip`.
    pub fn should_skip(&self, text: &str) -> bool {
        self.classify(text).skip
    }
}

fn normalize_term(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}
