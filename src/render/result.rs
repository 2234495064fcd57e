//! Segmentation result with window and statistics.

use serde::{Deserialize, Serialize};

use crate::engine::{DropReason, SegmentEvent};
use crate::model::{ContentWindow, Material, SegmentUnit};

/// Result of one segmentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Page range the units were taken from
    pub window: ContentWindow,

    /// Material kind the run was configured for
    pub material: Material,

    /// Surviving units in document order
    pub units: Vec<SegmentUnit>,

    /// Counters collected during the run
    pub stats: SegmentationStats,
}

impl SegmentationResult {
    /// Create a new segmentation result.
    pub fn new(
        window: ContentWindow,
        material: Material,
        units: Vec<SegmentUnit>,
        stats: SegmentationStats,
    ) -> Self {
        Self {
            window,
            material,
            units,
            stats,
        }
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if no unit survived.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Sequence numbers of the units, in order.
    pub fn sequence_numbers(&self) -> Vec<u32> {
        self.units.iter().map(|u| u.sequence_number).collect()
    }

    /// Find a unit by its sequence number.
    pub fn get(&self, sequence_number: u32) -> Option<&SegmentUnit> {
        self.units
            .iter()
            .find(|u| u.sequence_number == sequence_number)
    }
}

/// Counters collected from the event stream of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationStats {
    /// Total pages in the source
    pub page_count: u32,

    /// Pages read from the content window
    pub pages_read: u32,

    /// Pages in the window without text
    pub empty_pages: u32,

    /// Lines kept by the sanitizer
    pub lines_kept: u32,

    /// Lines dropped by a hard-skip entry
    pub lines_hard_skipped: u32,

    /// Lines emptied by excision
    pub lines_emptied: u32,

    /// Lines dropped as duplicates
    pub lines_duplicated: u32,

    /// Top-level blocks started
    pub blocks_accepted: u32,

    /// Non-increasing markers folded into a block
    pub sub_items_absorbed: u32,

    /// Unnumbered text appended to a block
    pub orphans_absorbed: u32,

    /// Unnumbered text dropped
    pub orphans_discarded: u32,

    /// Markers above the ceiling
    pub out_of_range: u32,

    /// Markers whose number could not be read
    pub unparsable_markers: u32,

    /// Blocks removed by the skip classifier
    pub blocks_skipped: u32,
}

impl SegmentationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update counters from one engine event.
    pub fn record(&mut self, event: &SegmentEvent) {
        match event {
            SegmentEvent::WindowLocated { page_count, .. } => {
                self.page_count = *page_count as u32;
            }
            SegmentEvent::PageEmpty { .. } => {
                self.pages_read += 1;
                self.empty_pages += 1;
            }
            SegmentEvent::LineDropped { reason, .. } => match reason {
                DropReason::HardSkip { .. } => self.lines_hard_skipped += 1,
                DropReason::Empty => self.lines_emptied += 1,
                DropReason::Duplicate => self.lines_duplicated += 1,
            },
            SegmentEvent::PageCleaned { kept, .. } => {
                self.pages_read += 1;
                self.lines_kept += *kept as u32;
            }
            SegmentEvent::MarkerFamilySelected { .. } => {}
            SegmentEvent::OrphanAbsorbed { .. } => self.orphans_absorbed += 1,
            SegmentEvent::OrphanDiscarded { .. } => self.orphans_discarded += 1,
            SegmentEvent::SubItemAbsorbed { .. } => self.sub_items_absorbed += 1,
            SegmentEvent::OutOfRange { .. } => self.out_of_range += 1,
            SegmentEvent::UnparsableMarker { .. } => self.unparsable_markers += 1,
            SegmentEvent::BlockAccepted { .. } => self.blocks_accepted += 1,
            SegmentEvent::BlockSkipped { .. } => self.blocks_skipped += 1,
            SegmentEvent::BlockKept { .. } => {}
        }
    }

    /// Total lines removed by the sanitizer.
    pub fn lines_dropped(&self) -> u32 {
        self.lines_hard_skipped + self.lines_emptied + self.lines_duplicated
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &SegmentationStats) {
        self.page_count += other.page_count;
        self.pages_read += other.pages_read;
        self.empty_pages += other.empty_pages;
        self.lines_kept += other.lines_kept;
        self.lines_hard_skipped += other.lines_hard_skipped;
        self.lines_emptied += other.lines_emptied;
        self.lines_duplicated += other.lines_duplicated;
        self.blocks_accepted += other.blocks_accepted;
        self.sub_items_absorbed += other.sub_items_absorbed;
        self.orphans_absorbed += other.orphans_absorbed;
        self.orphans_discarded += other.orphans_discarded;
        self.out_of_range += other.out_of_range;
        self.unparsable_markers += other.unparsable_markers;
        self.blocks_skipped += other.blocks_skipped;
    }
}
