//! Diagnostic event stream.
//!
//! Every decision the engine takes (dropping a line, absorbing a sub-item,
//! discarding an out-of-range number, skipping a visual question) is reported
//! as a [`SegmentEvent`] to an [`EventSink`]. Callers can collect, forward or
//! silence the stream without touching the algorithm.
//!
//! # Example
//!
//! ```
//! use exam_segmenter::{Document, Segmenter, SegmenterConfig};
//! use exam_segmenter::engine::SegmentEvent;
//!
//! let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
//! let doc = Document::from_texts(["Question 1 Define pH.\nQuestion 1 (again)"]);
//!
//! let mut events: Vec<SegmentEvent> = Vec::new();
//! let result = segmenter.segment_with_sink(&doc, &mut events);
//!
//! assert_eq!(result.units.len(), 1);
//! assert!(events
//!     .iter()
//!     .any(|e| matches!(e, SegmentEvent::SubItemAbsorbed { number: 1, into: 1 })));
//! ```

use crossbeam_channel::Sender;
use serde::Serialize;

use super::MarkerFamily;
use crate::model::ContentWindow;

/// Why a line was removed by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    /// The line contained a hard-skip entry
    HardSkip {
        /// The matching lexicon entry
        entry: String,
    },
    /// Nothing was left after excision and whitespace cleanup
    Empty,
    /// An identical line appeared earlier on the same page
    Duplicate,
}

/// A single engine decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SegmentEvent {
    /// The content window was located.
    WindowLocated {
        /// Detected window
        window: ContentWindow,
        /// Total pages in the source
        page_count: usize,
    },

    /// A page inside the window had no text.
    PageEmpty {
        /// 0-based page index
        page: usize,
    },

    /// The sanitizer removed a line.
    LineDropped {
        /// 0-based page index
        page: usize,
        /// The original line
        line: String,
        /// Why it was removed
        reason: DropReason,
    },

    /// A page finished sanitizing.
    PageCleaned {
        /// 0-based page index
        page: usize,
        /// Lines kept on the page
        kept: usize,
    },

    /// The marker family used for splitting was chosen.
    MarkerFamilySelected {
        /// Active family, or `None` when no marker matched at all
        family: Option<MarkerFamily>,
        /// Number of marker matches in the stream
        matches: usize,
    },

    /// Text without a marker was appended to the previous block.
    OrphanAbsorbed {
        /// Number of the receiving block
        into: u32,
        /// Absorbed text
        text: String,
    },

    /// Text without a marker was dropped because no block preceded it.
    OrphanDiscarded {
        /// Discarded text
        text: String,
    },

    /// A non-increasing number was treated as a nested item.
    SubItemAbsorbed {
        /// The number found in the marker
        number: u32,
        /// Number of the receiving block
        into: u32,
    },

    /// A number above the ceiling was discarded with its segment.
    OutOfRange {
        /// The number found in the marker
        number: u32,
        /// The configured ceiling
        limit: u32,
    },

    /// A marker's digits could not be read as a number.
    UnparsableMarker {
        /// The marker text
        marker: String,
    },

    /// A new top-level block was started.
    BlockAccepted {
        /// Block number
        number: u32,
    },

    /// A block was removed by the skip classifier.
    BlockSkipped {
        /// Block number
        number: u32,
        /// Keywords that triggered the skip
        keywords: Vec<String>,
    },

    /// A block passed classification (or classification was bypassed).
    BlockKept {
        /// Block number
        number: u32,
    },
}

impl SegmentEvent {
    /// Check if this event reports text that left the output.
    pub fn is_discard(&self) -> bool {
        matches!(
            self,
            SegmentEvent::OrphanDiscarded { .. }
                | SegmentEvent::OutOfRange { .. }
                | SegmentEvent::UnparsableMarker { .. }
                | SegmentEvent::BlockSkipped { .. }
        )
    }

    /// Check if this event is a recoverable anomaly worth a warning.
    pub fn is_anomaly(&self) -> bool {
        matches!(self, SegmentEvent::UnparsableMarker { .. })
    }
}

impl std::fmt::Display for SegmentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentEvent::WindowLocated { window, page_count } => {
                write!(f, "content window {} of {} pages", window, page_count)
            }
            SegmentEvent::PageEmpty { page } => write!(f, "page {} has no text", page),
            SegmentEvent::LineDropped { page, line, reason } => match reason {
                DropReason::HardSkip { entry } => {
                    write!(f, "page {}: dropped {:?} (matched {:?})", page, line, entry)
                }
                DropReason::Empty => write!(f, "page {}: dropped {:?} (empty)", page, line),
                DropReason::Duplicate => {
                    write!(f, "page {}: dropped {:?} (duplicate)", page, line)
                }
            },
            SegmentEvent::PageCleaned { page, kept } => {
                write!(f, "page {}: kept {} lines", page, kept)
            }
            SegmentEvent::MarkerFamilySelected { family, matches } => match family {
                Some(family) => write!(f, "splitting on {} markers ({} found)", family, matches),
                None => write!(f, "no numbering markers found"),
            },
            SegmentEvent::OrphanAbsorbed { into, text } => {
                write!(f, "appended unnumbered text to Q{}: {:?}", into, text)
            }
            SegmentEvent::OrphanDiscarded { text } => {
                write!(f, "discarded unnumbered text: {:?}", text)
            }
            SegmentEvent::SubItemAbsorbed { number, into } => {
                write!(f, "sub-item detected (Q{} <= Q{}), appended to Q{}", number, into, into)
            }
            SegmentEvent::OutOfRange { number, limit } => {
                write!(f, "discarded marker {} (above {})", number, limit)
            }
            SegmentEvent::UnparsableMarker { marker } => {
                write!(f, "discarded unreadable marker {:?}", marker)
            }
            SegmentEvent::BlockAccepted { number } => write!(f, "added question {}", number),
            SegmentEvent::BlockSkipped { number, keywords } => {
                write!(f, "skipped question {}: matched {:?}", number, keywords)
            }
            SegmentEvent::BlockKept { number } => write!(f, "kept question {}", number),
        }
    }
}

/// Receiver for engine events.
pub trait EventSink {
    /// Called once per engine decision, in processing order.
    fn emit(&mut self, event: &SegmentEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &SegmentEvent) {}
}

/// Forwards events to the `log` facade.
///
/// Anomalies log at `warn`, line-level noise at `trace`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &SegmentEvent) {
        match event {
            e if e.is_anomaly() => log::warn!("{}", e),
            SegmentEvent::LineDropped { .. } => log::trace!("{}", event),
            _ => log::debug!("{}", event),
        }
    }
}

impl EventSink for Vec<SegmentEvent> {
    fn emit(&mut self, event: &SegmentEvent) {
        self.push(event.clone());
    }
}

/// Sends events over a crossbeam channel, e.g. to a UI or writer thread.
///
/// A disconnected receiver silently stops delivery.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<SegmentEvent>,
}

impl ChannelSink {
    /// Create a sink sending on `sender`.
    pub fn new(sender: Sender<SegmentEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &SegmentEvent) {
        let _ = self.sender.send(event.clone());
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&SegmentEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: &SegmentEvent) {
        (self.0)(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &SegmentEvent) {
        (**self).emit(event)
    }
}
