//! Segmentation engine.
//!
//! The pipeline runs in four stages over a [`PageSource`](crate::source::PageSource):
//!
//! 1. [`WindowLocator`] finds the pages holding the real questions
//! 2. [`LineSanitizer`] strips boilerplate lines and instructional phrases
//! 3. [`BlockSegmenter`] splits the cleaned stream on numbering markers
//! 4. [`SkipClassifier`] drops questions that depend on a figure
//!
//! [`Segmenter`] owns one compiled instance of each stage.

mod batch;
mod classify;
pub mod events;
mod options;
mod sanitize;
mod segment;
mod segmenter;
mod window;

pub use batch::{total_stats, BatchOutcome};
pub use classify::{SkipClassifier, SkipDecision};
pub use events::{
    ChannelSink, DropReason, EventSink, FnSink, LogSink, NullSink, SegmentEvent,
};
pub use options::{
    KeywordExemption, Lexicon, LexiconPreset, MarkerFamily, SegmenterConfig,
    DEFAULT_MAX_SEQUENCE_NUMBER,
};
pub use sanitize::{join_lines, LineSanitizer, LINE_JOIN};
pub use segment::BlockSegmenter;
pub use segmenter::{ReferenceOptions, Segmenter, DEFAULT_STOP_PHRASE};
pub use window::WindowLocator;
