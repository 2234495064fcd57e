//! Block segmentation of the cleaned text stream.
//!
//! The stream is cut in front of every numbering marker of the active family.
//! A cut only opens a new block when its number is above the last accepted
//! one and within the ceiling; restated or nested numbers ("1." inside part
//! (a) of question 3) are folded back into the block they belong to.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::events::{EventSink, NullSink, SegmentEvent};
use super::sanitize::collapse_whitespace;
use super::{MarkerFamily, SegmenterConfig};
use crate::model::Block;

static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:question\s+|q\s?)(\d+)[.:)]?").expect("valid question marker regex")
});

static NUMERAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(\d+)[ \t]*\.(?:[ \t]+|$)").expect("valid numeral marker regex")
});

impl MarkerFamily {
    /// Regex matching this family's markers; group 1 holds the number.
    pub fn pattern(&self) -> &'static Regex {
        match self {
            MarkerFamily::Question => &QUESTION_MARKER,
            MarkerFamily::Numeral => &NUMERAL_MARKER,
        }
    }
}

/// Splits a cleaned text stream into numbered blocks.
#[derive(Debug, Clone)]
pub struct BlockSegmenter {
    preference: Vec<MarkerFamily>,
    max_sequence_number: u32,
}

impl BlockSegmenter {
    /// Create a segmenter from the configured marker preference and ceiling.
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            preference: config.marker_preference.clone(),
            max_sequence_number: config.max_sequence_number,
        }
    }

    /// First family in preference order with at least one marker in `stream`.
    pub fn active_family(&self, stream: &str) -> Option<MarkerFamily> {
        self.preference
            .iter()
            .copied()
            .find(|family| family.pattern().is_match(stream))
    }

    /// Segment `stream` without reporting events.
    pub fn segment(&self, stream: &str) -> Vec<Block> {
        self.segment_with_events(stream, &mut NullSink)
    }

    /// Segment `stream`, reporting each accept/absorb/discard decision.
    pub fn segment_with_events(&self, stream: &str, sink: &mut dyn EventSink) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::new();

        let Some(family) = self.active_family(stream) else {
            sink.emit(&SegmentEvent::MarkerFamilySelected {
                family: None,
                matches: 0,
            });
            absorb_orphan(&mut blocks, stream, sink);
            return blocks;
        };

        let markers: Vec<Captures<'_>> = family.pattern().captures_iter(stream).collect();
        sink.emit(&SegmentEvent::MarkerFamilySelected {
            family: Some(family),
            matches: markers.len(),
        });

        let starts: Vec<usize> = markers
            .iter()
            .filter_map(|caps| caps.get(0).map(|m| m.start()))
            .collect();

        // Text before the first marker has no block to join
        if let Some(&first) = starts.first() {
            absorb_orphan(&mut blocks, &stream[..first], sink);
        }

        let mut last_accepted: Option<u32> = None;

        for (i, caps) in markers.iter().enumerate() {
            let Some(marker) = caps.get(0) else {
                continue;
            };
            let end = starts.get(i + 1).copied().unwrap_or(stream.len());
            let segment = &stream[marker.start()..end];
            let digits = caps.get(1).map_or("", |m| m.as_str());

            let number = match digits.parse::<u32>() {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("Unreadable marker {:?}: {}", marker.as_str(), e);
                    sink.emit(&SegmentEvent::UnparsableMarker {
                        marker: marker.as_str().trim().to_string(),
                    });
                    continue;
                }
            };

            if number > self.max_sequence_number {
                sink.emit(&SegmentEvent::OutOfRange {
                    number,
                    limit: self.max_sequence_number,
                });
                continue;
            }

            match last_accepted {
                Some(prev) if number <= prev => {
                    if let Some(block) = blocks.last_mut() {
                        block.absorb(&collapse_whitespace(segment));
                    }
                    sink.emit(&SegmentEvent::SubItemAbsorbed { number, into: prev });
                }
                _ => {
                    let body = collapse_whitespace(&stream[marker.end()..end]);
                    blocks.push(Block::new(number, body));
                    last_accepted = Some(number);
                    sink.emit(&SegmentEvent::BlockAccepted { number });
                }
            }
        }

        blocks
    }
}

/// Append unnumbered text to the last block, or report it as discarded.
fn absorb_orphan(blocks: &mut [Block], text: &str, sink: &mut dyn EventSink) {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return;
    }
    match blocks.last_mut() {
        Some(block) => {
            block.absorb(&text);
            sink.emit(&SegmentEvent::OrphanAbsorbed {
                into: block.sequence_number,
                text,
            });
        }
        None => sink.emit(&SegmentEvent::OrphanDiscarded { text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> BlockSegmenter {
        BlockSegmenter::new(&SegmenterConfig::default())
    }

    fn numbers(blocks: &[Block]) -> Vec<u32> {
        blocks.iter().map(|b| b.sequence_number).collect()
    }

    #[test]
    fn test_question_markers() {
        let blocks = segmenter().segment("Question 1 Define pH.\nQuestion 2 Name a breed.");
        assert_eq!(
            blocks,
            vec![Block::new(1, "Define pH."), Block::new(2, "Name a breed.")]
        );
    }

    #[test]
    fn test_short_q_markers() {
        let blocks = segmenter().segment("Q1. Lime\nQ 2: Drainage\nq3) Texture");
        assert_eq!(numbers(&blocks), vec![1, 2, 3]);
        assert_eq!(blocks[1].text, "Drainage");
        assert_eq!(blocks[2].text, "Texture");
    }

    #[test]
    fn test_monotonic_rule_absorbs_restated_number() {
        let blocks = segmenter().segment("Question 1 A (sub) 1. note Question 2 B");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].sequence_number, 1);
        assert!(blocks[0].text.contains('A'));
        assert!(blocks[0].text.contains("1. note"));
        assert_eq!(blocks[1], Block::new(2, "B"));
    }

    #[test]
    fn test_non_increasing_marker_appended_with_marker_text() {
        let blocks = segmenter().segment("Question 3 Soil\nQuestion 2 as in part (a)\nQuestion 4 Crops");
        assert_eq!(numbers(&blocks), vec![3, 4]);
        assert_eq!(blocks[0].text, "Soil Question 2 as in part (a)");
    }

    #[test]
    fn test_out_of_range_segment_discarded_entirely() {
        let mut events: Vec<SegmentEvent> = Vec::new();
        let blocks = segmenter().segment_with_events(
            "Question 1 Alpha\nQuestion 25 marks are awarded here\nQuestion 2 Beta",
            &mut events,
        );
        assert_eq!(
            blocks,
            vec![Block::new(1, "Alpha"), Block::new(2, "Beta")]
        );
        assert!(events.contains(&SegmentEvent::OutOfRange {
            number: 25,
            limit: 20
        }));
    }

    #[test]
    fn test_unparsable_number_dropped() {
        let mut events: Vec<SegmentEvent> = Vec::new();
        let blocks = segmenter().segment_with_events(
            "Question 1 Alpha Question 99999999999999999999 overflow Question 2 Beta",
            &mut events,
        );
        assert_eq!(numbers(&blocks), vec![1, 2]);
        assert_eq!(blocks[0].text, "Alpha");
        assert!(events
            .iter()
            .any(|e| matches!(e, SegmentEvent::UnparsableMarker { .. })));
    }

    #[test]
    fn test_preamble_discarded() {
        let mut events: Vec<SegmentEvent> = Vec::new();
        let blocks =
            segmenter().segment_with_events("Instructions here\nQuestion 1 Define pH.", &mut events);
        assert_eq!(blocks, vec![Block::new(1, "Define pH.")]);
        assert!(events.contains(&SegmentEvent::OrphanDiscarded {
            text: "Instructions here".to_string()
        }));
    }

    #[test]
    fn test_numeral_fallback_is_line_anchored() {
        let stream = "1. Define pH.\nWeigh 2. grams of soil\n2. Name a breed.\n3.5 kg of feed\n3. List crops.";
        let segmenter = segmenter();
        assert_eq!(segmenter.active_family(stream), Some(MarkerFamily::Numeral));

        let blocks = segmenter.segment(stream);
        assert_eq!(numbers(&blocks), vec![1, 2, 3]);
        assert_eq!(blocks[0].text, "Define pH. Weigh 2. grams of soil");
        assert_eq!(blocks[1].text, "Name a breed. 3.5 kg of feed");
    }

    #[test]
    fn test_numeral_sub_item_absorbed() {
        let blocks = segmenter().segment("1. A\n2. B\n1. sub\n3. C");
        assert_eq!(numbers(&blocks), vec![1, 2, 3]);
        assert_eq!(blocks[1].text, "B 1. sub");
    }

    #[test]
    fn test_question_family_preferred_over_numerals() {
        let stream = "1. intro\nQuestion 1 Define pH.";
        assert_eq!(segmenter().active_family(stream), Some(MarkerFamily::Question));
    }

    #[test]
    fn test_preference_order_is_configurable() {
        let config =
            SegmenterConfig::new().with_marker_preference(vec![MarkerFamily::Numeral]);
        let segmenter = BlockSegmenter::new(&config);
        assert_eq!(segmenter.active_family("Question 1 Define pH."), None);
        assert!(segmenter.segment("Question 1 Define pH.").is_empty());
    }

    #[test]
    fn test_gaps_allowed() {
        let blocks = segmenter().segment("Question 2 B\nQuestion 5 E");
        assert_eq!(numbers(&blocks), vec![2, 5]);
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        let mut events: Vec<SegmentEvent> = Vec::new();
        let blocks = segmenter().segment_with_events("just prose", &mut events);
        assert!(blocks.is_empty());
        assert_eq!(
            events,
            vec![
                SegmentEvent::MarkerFamilySelected {
                    family: None,
                    matches: 0
                },
                SegmentEvent::OrphanDiscarded {
                    text: "just prose".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_words_containing_q_are_not_markers() {
        let blocks = segmenter().segment("Question 1 Iraq 2 and technique 3 apply");
        assert_eq!(blocks, vec![Block::new(1, "Iraq 2 and technique 3 apply")]);
    }
}
