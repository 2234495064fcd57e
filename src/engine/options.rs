//! Segmenter configuration.
//!
//! Everything that varied between exam years and paper levels (the three
//! lexicons, the page signatures and the marker preference) lives here as
//! plain data, so several configurations can run side by side.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Material;

/// Default ceiling for a top-level question number.
pub const DEFAULT_MAX_SEQUENCE_NUMBER: u32 = 20;

/// Numbering convention used to find block boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerFamily {
    /// "Question 7", "Q7", "Q 7"
    Question,
    /// A bare "7." at the start of a line
    Numeral,
}

impl std::fmt::Display for MarkerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerFamily::Question => write!(f, "question"),
            MarkerFamily::Numeral => write!(f, "numeral"),
        }
    }
}

/// Built-in lexicon sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexiconPreset {
    /// Keyword list used for the official papers
    #[default]
    Standard,
    /// Wider visual-keyword list (pre-leaving papers with tick-box layouts)
    Broad,
}

/// A phrase that cancels one keyword's skip signal.
///
/// With `{ phrase: "labelled diagram", neutralizes: "diagram" }`, a question
/// asking the candidate to *draw* a labelled diagram stays answerable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordExemption {
    /// Phrase whose presence triggers the exemption
    pub phrase: String,
    /// Keyword that no longer counts when the phrase is present
    pub neutralizes: String,
}

impl KeywordExemption {
    /// Create a new exemption.
    pub fn new(phrase: impl Into<String>, neutralizes: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            neutralizes: neutralizes.into(),
        }
    }
}

/// Word lists driving the sanitizer and the skip classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// A line containing any of these (case-insensitive) is dropped
    pub hard_skip: Vec<String>,

    /// Phrases cut out of a line, leaving the rest (case-insensitive)
    pub soft_skip: Vec<String>,

    /// Terms marking a question as unanswerable without a figure
    pub visual_keywords: Vec<String>,

    /// Phrases that cancel a visual keyword
    pub exemptions: Vec<KeywordExemption>,
}

impl Lexicon {
    /// Create a lexicon from a preset.
    pub fn from_preset(preset: LexiconPreset) -> Self {
        match preset {
            LexiconPreset::Standard => Self::standard(),
            LexiconPreset::Broad => Self::broad(),
        }
    }

    /// Standard lexicon.
    pub fn standard() -> Self {
        Self {
            hard_skip: strings(&[
                "BLANK PAGE",
                "Question 1 carries 60 marks",
                "Leaving Certificate Examination",
                "Agricultural Science – Ordinary Level",
                "Agricultural Science – Higher Level",
                "ORDINARY LEVEL AGRICULTURAL SCIENCE  |  Pre-Leaving Certificate, 2025",
                "HIGHER LEVEL AGRICULTURAL SCIENCE  |  Pre-Leaving Certificate, 2025",
                "Page",
                "section",
                "ordinary",
                "higher",
                "level",
            ]),
            // Longer phrases first: "Answer" would otherwise eat into them
            soft_skip: strings(&[
                "**Accept other valid answers",
                "other valid responses",
                "Any three valid points",
                "Answer",
            ]),
            visual_keywords: strings(&[
                "image",
                "picture",
                "diagram",
                "graph",
                "photograph",
                "figure",
                "illustration",
                "a tick",
                "correct box",
                "table",
                "shown",
                "true",
                "false",
            ]),
            exemptions: vec![KeywordExemption::new("labelled diagram", "diagram")],
        }
    }

    /// Broad lexicon: standard lists plus the wider visual vocabulary.
    pub fn broad() -> Self {
        let mut lexicon = Self::standard();
        lexicon.visual_keywords = strings(&[
            "showed",
            "\u{f0fc}", // tick glyph from symbol fonts
            "image",
            "following",
            "from the list",
            "picture",
            "shown",
            "diagram",
            "graph",
            "photograph",
            "table",
            "figure",
            "illustration",
            "displayed",
            "depicted",
            "represented",
            "a tick",
            "correct box",
            "true",
            "false",
            "correct",
            "incorrect",
        ]);
        lexicon
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Options for a segmentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Questions (classified) or solutions (kept as-is)
    pub material: Material,

    /// Sanitizer and classifier word lists
    pub lexicon: Lexicon,

    /// Regexes marking the first content page
    pub start_signatures: Vec<String>,

    /// Regexes marking trailing boilerplate pages
    pub end_signatures: Vec<String>,

    /// Marker families in order of preference
    pub marker_preference: Vec<MarkerFamily>,

    /// Numbers above this are treated as spurious
    pub max_sequence_number: u32,

    /// Apply NFC normalization and ligature expansion before line cleanup
    pub normalize_unicode: bool,
}

impl SegmenterConfig {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for answer keys: classification is bypassed.
    pub fn solutions() -> Self {
        Self::default().with_material(Material::Solutions)
    }

    /// Set the material kind.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Replace the lexicon.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Replace the lexicon with a preset.
    pub fn with_preset(mut self, preset: LexiconPreset) -> Self {
        self.lexicon = Lexicon::from_preset(preset);
        self
    }

    /// Set the content-start page signatures.
    pub fn with_start_signatures<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.start_signatures = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the content-end page signatures.
    pub fn with_end_signatures<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.end_signatures = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the marker family preference order.
    pub fn with_marker_preference(mut self, families: Vec<MarkerFamily>) -> Self {
        self.marker_preference = families;
        self
    }

    /// Set the ceiling for top-level numbers.
    pub fn with_max_sequence_number(mut self, max: u32) -> Self {
        self.max_sequence_number = max;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Check settings that cannot be repaired at run time.
    ///
    /// Signature regexes are compiled (and reported) by the segmenter itself.
    pub fn validate(&self) -> Result<()> {
        if self.marker_preference.is_empty() {
            return Err(Error::InvalidConfig(
                "marker preference is empty".to_string(),
            ));
        }
        if self.max_sequence_number == 0 {
            return Err(Error::InvalidConfig(
                "max_sequence_number must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize options as pretty JSON (usable as a config template).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            material: Material::Questions,
            lexicon: Lexicon::standard(),
            start_signatures: strings(&[
                r"(?i)\bquestion\s+1\b",
                r"(?m)^\s*1\s*\.",
                r"(?i)\bq\s?1\b",
            ]),
            end_signatures: strings(&[r"(?i)blank page|acknowledgements"]),
            marker_preference: vec![MarkerFamily::Question, MarkerFamily::Numeral],
            max_sequence_number: DEFAULT_MAX_SEQUENCE_NUMBER,
            normalize_unicode: true,
        }
    }
}
