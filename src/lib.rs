//! # exam-segmenter
//!
//! Question segmentation for OCR'd and PDF-extracted exam papers.
//!
//! Extracted exam text is noisy: cover pages, running headers, level banners,
//! marking instructions and sub-part numbering all sit between the questions.
//! This library turns a paginated document into an ordered list of numbered,
//! self-contained question blocks and drops the ones that cannot be answered
//! without a figure.
//!
//! ## Quick Start
//!
//! ```no_run
//! use exam_segmenter::{segment_file, render, JsonFormat};
//!
//! fn main() -> exam_segmenter::Result<()> {
//!     let result = segment_file("paper_2015.pdf")?;
//!     println!("{}", render::to_json(&result, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Content window**: skips cover and instruction pages, stops at the
//!   trailing blank/acknowledgements page
//! - **Line cleanup**: hard-skip lines, soft-skip phrase excision, per-page dedup
//! - **Block segmentation**: "Question N" / "QN" markers, or bare "N." lines,
//!   with a monotonic rule that folds nested numbering into its parent
//! - **Skip classification**: visual-dependency keywords with exemptions
//! - **Parallel batches**: Rayon across documents

pub mod detect;
pub mod engine;
pub mod error;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, SourceFormat};
pub use engine::{
    BatchOutcome, EventSink, KeywordExemption, Lexicon, LexiconPreset, MarkerFamily,
    ReferenceOptions, SegmentEvent, Segmenter, SegmenterConfig,
};
pub use error::{Error, Result};
pub use model::{Block, ContentWindow, Document, Material, Page, SegmentUnit};
pub use render::{JsonFormat, SegmentationResult, SegmentationStats};
pub use source::PageSource;

use std::path::Path;

/// Segment a file (PDF, JSON page array or form-feed separated text) with
/// the default configuration.
///
/// # Example
///
/// ```no_run
/// use exam_segmenter::segment_file;
///
/// let result = segment_file("paper_2015.txt").unwrap();
/// for unit in &result.units {
///     println!("Q{}: {}", unit.sequence_number, unit.text);
/// }
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<SegmentationResult> {
    segment_file_with_config(path, SegmenterConfig::default())
}

/// Segment a file with a custom configuration.
///
/// # Example
///
/// ```no_run
/// use exam_segmenter::{segment_file_with_config, LexiconPreset, SegmenterConfig};
///
/// let config = SegmenterConfig::new().with_preset(LexiconPreset::Broad);
/// let result = segment_file_with_config("pre_leaving.pdf", config).unwrap();
/// ```
pub fn segment_file_with_config<P: AsRef<Path>>(
    path: P,
    config: SegmenterConfig,
) -> Result<SegmentationResult> {
    Segmenter::new(config)?.segment_path(path)
}

/// Segment in-memory input with the default configuration.
pub fn segment_bytes(data: &[u8]) -> Result<SegmentationResult> {
    let source = source::open_bytes(data)?;
    Ok(Segmenter::new(SegmenterConfig::default())?.segment(&*source))
}

/// Segment per-page text with the default configuration.
///
/// # Example
///
/// ```
/// use exam_segmenter::segment_pages;
///
/// let result = segment_pages(vec![
///     Some("Cover page"),
///     Some("Question 1 Define pH.\nQuestion 2 Name a dairy breed."),
///     None,
/// ])
/// .unwrap();
/// assert_eq!(result.sequence_numbers(), vec![1, 2]);
/// ```
pub fn segment_pages<I, S>(pages: I) -> Result<SegmentationResult>
where
    I: IntoIterator<Item = Option<S>>,
    S: Into<String>,
{
    let doc = Document::from_page_texts(pages);
    Ok(Segmenter::new(SegmenterConfig::default())?.segment(&doc))
}

/// Segment a file and render its units as JSON.
///
/// # Example
///
/// ```no_run
/// use exam_segmenter::{to_json, JsonFormat};
///
/// let json = to_json("paper_2015.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("questions.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = segment_file(path)?;
    render::to_json(&result, format)
}

/// Read a file asynchronously, then segment it.
///
/// Only the read is asynchronous; segmentation itself runs on the calling task.
#[cfg(feature = "async")]
pub async fn segment_file_async<P: AsRef<Path>>(
    path: P,
    config: SegmenterConfig,
) -> Result<SegmentationResult> {
    let data = tokio::fs::read(path.as_ref()).await?;
    let segmenter = Segmenter::new(config)?;
    let source = source::open_bytes(&data)?;
    Ok(segmenter.segment(&*source))
}

/// Builder for segmenting exam papers.
///
/// # Example
///
/// ```no_run
/// use exam_segmenter::{ExamSegmenter, JsonFormat, LexiconPreset};
///
/// let json = ExamSegmenter::new()
///     .solutions()
///     .with_preset(LexiconPreset::Broad)
///     .with_max_sequence_number(15)
///     .segment("marking_scheme.pdf")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), exam_segmenter::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamSegmenter {
    config: SegmenterConfig,
}

impl ExamSegmenter {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Treat the input as an answer key (no skip classification).
    pub fn solutions(mut self) -> Self {
        self.config = self.config.with_material(Material::Solutions);
        self
    }

    /// Use a lexicon preset.
    pub fn with_preset(mut self, preset: LexiconPreset) -> Self {
        self.config = self.config.with_preset(preset);
        self
    }

    /// Set the ceiling for top-level question numbers.
    pub fn with_max_sequence_number(mut self, max: u32) -> Self {
        self.config = self.config.with_max_sequence_number(max);
        self
    }

    /// Compile the configuration.
    pub fn build(self) -> Result<Segmenter> {
        Segmenter::new(self.config)
    }

    /// Segment a file.
    pub fn segment<P: AsRef<Path>>(self, path: P) -> Result<ExamResult> {
        let result = self.build()?.segment_path(path)?;
        Ok(ExamResult { result })
    }

    /// Segment in-memory input.
    pub fn segment_bytes(self, data: &[u8]) -> Result<ExamResult> {
        let segmenter = self.build()?;
        let source = source::open_bytes(data)?;
        Ok(ExamResult {
            result: segmenter.segment(&*source),
        })
    }
}

/// Result of segmenting a paper through [`ExamSegmenter`].
#[derive(Debug, Clone)]
pub struct ExamResult {
    /// The segmentation result
    pub result: SegmentationResult,
}

impl ExamResult {
    /// Render the units as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Render the full report (window, units, statistics) as JSON.
    pub fn report_json(&self, format: JsonFormat) -> Result<String> {
        render::report_to_json(&self.result, format)
    }

    /// Get the surviving units.
    pub fn units(&self) -> &[SegmentUnit] {
        &self.result.units
    }
}
