//! The segmentation pipeline.
//!
//! [`Segmenter`] ties the stages together: window location, line cleanup,
//! block segmentation and skip classification. It is built once from a
//! [`SegmenterConfig`] (compiling every pattern up front) and can then be
//! shared across threads and reused for any number of documents.

use std::path::Path;

use super::classify::SkipClassifier;
use super::events::{EventSink, LogSink, NullSink, SegmentEvent};
use super::sanitize::{join_lines, LineSanitizer};
use super::segment::BlockSegmenter;
use super::window::WindowLocator;
use super::SegmenterConfig;
use crate::error::Result;
use crate::model::{Block, ContentWindow, Material, SegmentUnit};
use crate::render::{SegmentationResult, SegmentationStats};
use crate::source::{open_path, PageSource};

/// Default phrase ending the reference text (printed on answer-space pages).
pub const DEFAULT_STOP_PHRASE: &str = "Do not write on this page";

/// Options for [`Segmenter::reference_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOptions {
    /// Leave out the first page of the content window
    pub skip_first_content_page: bool,

    /// Stop before the first page whose raw text contains this phrase
    /// (case-insensitive)
    pub stop_phrase: Option<String>,
}

impl ReferenceOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or skip the first content page.
    pub fn with_skip_first_content_page(mut self, skip: bool) -> Self {
        self.skip_first_content_page = skip;
        self
    }

    /// Set the stop phrase; `None` reads to the end of the window.
    pub fn with_stop_phrase(mut self, phrase: Option<String>) -> Self {
        self.stop_phrase = phrase;
        self
    }
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            skip_first_content_page: true,
            stop_phrase: Some(DEFAULT_STOP_PHRASE.to_string()),
        }
    }
}

/// Compiled segmentation pipeline.
///
/// # Example
///
/// ```
/// use exam_segmenter::{Document, Segmenter, SegmenterConfig};
///
/// let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
/// let doc = Document::from_texts([
///     "Leaving Certificate Examination\nInstructions",
///     "Question 1 Define pH.\nQuestion 2 Study the graph below.",
///     "Question 3 Name a dairy breed.",
/// ]);
///
/// let result = segmenter.segment(&doc);
/// assert_eq!(result.sequence_numbers(), vec![1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    locator: WindowLocator,
    sanitizer: LineSanitizer,
    blocks: BlockSegmenter,
    classifier: SkipClassifier,
}

impl Segmenter {
    /// Validate `config` and compile its patterns.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            locator: WindowLocator::new(&config)?,
            sanitizer: LineSanitizer::new(&config)?,
            blocks: BlockSegmenter::new(&config),
            classifier: SkipClassifier::new(&config),
            config,
        })
    }

    /// The configuration this segmenter was built from.
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Locate the content window of `source`.
    pub fn locate_window<S: PageSource + ?Sized>(&self, source: &S) -> ContentWindow {
        self.locator.locate(source)
    }

    /// Sanitize the pages of `window` into the text stream fed to the block segmenter.
    pub fn clean_stream<S: PageSource + ?Sized>(&self, source: &S, window: &ContentWindow) -> String {
        join_lines(&self.sanitizer.clean_pages(source, window, &mut NullSink))
    }

    /// Run the full pipeline, logging every decision through `log`.
    pub fn segment<S: PageSource + ?Sized>(&self, source: &S) -> SegmentationResult {
        self.segment_with_sink(source, &mut LogSink)
    }

    /// Run the full pipeline, reporting every decision to `sink`.
    pub fn segment_with_sink<S: PageSource + ?Sized>(
        &self,
        source: &S,
        sink: &mut dyn EventSink,
    ) -> SegmentationResult {
        let mut recorder = StatsRecorder::new(sink);

        let window = self.locator.locate(source);
        recorder.emit(&SegmentEvent::WindowLocated {
            window,
            page_count: source.page_count(),
        });

        let lines = self.sanitizer.clean_pages(source, &window, &mut recorder);
        let stream = join_lines(&lines);
        let blocks = self.blocks.segment_with_events(&stream, &mut recorder);
        let units = self.filter_blocks(blocks, &mut recorder);

        SegmentationResult::new(window, self.config.material, units, recorder.stats)
    }

    /// Segment an already cleaned text stream (no window, no sanitizing).
    pub fn segment_stream(&self, stream: &str, sink: &mut dyn EventSink) -> Vec<SegmentUnit> {
        let blocks = self.blocks.segment_with_events(stream, sink);
        self.filter_blocks(blocks, sink)
    }

    /// Open a file and segment it.
    pub fn segment_path<P: AsRef<Path>>(&self, path: P) -> Result<SegmentationResult> {
        let path = path.as_ref();
        log::debug!("Segmenting {}", path.display());
        let source = open_path(path)?;
        Ok(self.segment(&*source))
    }

    /// Sanitized text of the content window, for use as reference material.
    ///
    /// No segmentation or classification is applied.
    pub fn reference_text<S: PageSource + ?Sized>(
        &self,
        source: &S,
        options: &ReferenceOptions,
    ) -> String {
        let window = self.locator.locate(source);
        let mut pages = window.range(source.page_count());
        if options.skip_first_content_page && !pages.is_empty() {
            pages.start += 1;
        }

        let stop = options
            .stop_phrase
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_lowercase);

        let mut sink = LogSink;
        let mut lines = Vec::new();
        for page in pages {
            let text = source.page_text(page);
            if let (Some(stop), Some(text)) = (&stop, text.as_deref()) {
                if text.to_lowercase().contains(stop.as_str()) {
                    log::debug!("Reference text stops at page {}", page);
                    break;
                }
            }
            lines.extend(
                self.sanitizer
                    .clean_page_with_events(page, text.as_deref(), &mut sink),
            );
        }
        join_lines(&lines)
    }

    fn filter_blocks(&self, blocks: Vec<Block>, sink: &mut dyn EventSink) -> Vec<SegmentUnit> {
        blocks
            .into_iter()
            .filter(|block| {
                if self.config.material == Material::Solutions {
                    sink.emit(&SegmentEvent::BlockKept {
                        number: block.sequence_number,
                    });
                    return true;
                }

                let decision = self.classifier.classify(&block.text);
                if decision.skip {
                    sink.emit(&SegmentEvent::BlockSkipped {
                        number: block.sequence_number,
                        keywords: decision.matched,
                    });
                    false
                } else {
                    sink.emit(&SegmentEvent::BlockKept {
                        number: block.sequence_number,
                    });
                    true
                }
            })
            .map(SegmentUnit::from)
            .collect()
    }
}

/// Counts events into [`SegmentationStats`] before passing them on.
struct StatsRecorder<'a> {
    inner: &'a mut dyn EventSink,
    stats: SegmentationStats,
}

impl<'a> StatsRecorder<'a> {
    fn new(inner: &'a mut dyn EventSink) -> Self {
        Self {
            inner,
            stats: SegmentationStats::new(),
        }
    }
}

impl EventSink for StatsRecorder<'_> {
    fn emit(&mut self, event: &SegmentEvent) {
        self.stats.record(event);
        self.inner.emit(event);
    }
}
