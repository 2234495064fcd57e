//! Integration tests for the engine event stream.

use exam_segmenter::engine::{ChannelSink, DropReason, FnSink, NullSink, SegmentEvent};
use exam_segmenter::{Document, MarkerFamily, Segmenter, SegmenterConfig};

fn create_sample_document() -> Document {
    Document::from_page_texts(vec![
        // Cover page
        Some("Leaving Certificate Examination\nInstructions to candidates"),
        // Questions
        Some("Question 1 Define pH.\nPage 2\nQuestion 1 (b) Explain liming."),
        None,
        Some("Question 25 marks\nQuestion 2 Study the graph.\nQuestion 3 Name a breed."),
        Some("Acknowledgements"),
    ])
}

fn collect_events(doc: &Document) -> Vec<SegmentEvent> {
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let mut events: Vec<SegmentEvent> = Vec::new();
    segmenter.segment_with_sink(doc, &mut events);
    events
}

#[test]
fn test_window_event_comes_first() {
    let events = collect_events(&create_sample_document());

    assert_eq!(
        events.first(),
        Some(&SegmentEvent::WindowLocated {
            window: exam_segmenter::ContentWindow::new(1, Some(5)),
            page_count: 5,
        })
    );
}

#[test]
fn test_cover_page_never_read() {
    let events = collect_events(&create_sample_document());

    assert!(!events.iter().any(|e| matches!(
        e,
        SegmentEvent::PageCleaned { page: 0, .. } | SegmentEvent::LineDropped { page: 0, .. }
    )));
}

#[test]
fn test_every_decision_reported() {
    let events = collect_events(&create_sample_document());

    assert!(events.contains(&SegmentEvent::LineDropped {
        page: 1,
        line: "Page 2".to_string(),
        reason: DropReason::HardSkip {
            entry: "Page".to_string(),
        },
    }));
    assert!(events.contains(&SegmentEvent::PageEmpty { page: 2 }));
    assert!(events.contains(&SegmentEvent::MarkerFamilySelected {
        family: Some(MarkerFamily::Question),
        matches: 5,
    }));
    assert!(events.contains(&SegmentEvent::SubItemAbsorbed { number: 1, into: 1 }));
    assert!(events.contains(&SegmentEvent::OutOfRange {
        number: 25,
        limit: 20
    }));
    assert!(events.contains(&SegmentEvent::BlockSkipped {
        number: 2,
        keywords: vec!["graph".to_string()],
    }));
    assert!(events.contains(&SegmentEvent::BlockKept { number: 3 }));
}

#[test]
fn test_block_events_in_order() {
    let events = collect_events(&create_sample_document());

    let accepted: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            SegmentEvent::BlockAccepted { number } => Some(*number),
            _ => None,
        })
        .collect();
    assert_eq!(accepted, vec![1, 2, 3]);
}

#[test]
fn test_stats_match_event_counts() {
    let doc = create_sample_document();
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();

    let mut discards = 0u32;
    let result = segmenter.segment_with_sink(
        &doc,
        &mut FnSink(|e: &SegmentEvent| {
            if e.is_discard() {
                discards += 1;
            }
        }),
    );

    let stats = &result.stats;
    assert_eq!(
        discards,
        stats.orphans_discarded + stats.out_of_range + stats.unparsable_markers + stats.blocks_skipped
    );
    assert_eq!(result.sequence_numbers(), vec![1, 3]);
}

#[test]
fn test_null_sink_gives_same_result() {
    let doc = create_sample_document();
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();

    let silent = segmenter.segment_with_sink(&doc, &mut NullSink);
    let logged = segmenter.segment(&doc);
    assert_eq!(silent, logged);
}

#[test]
fn test_channel_sink_across_threads() {
    let doc = create_sample_document();
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let (tx, rx) = crossbeam_channel::unbounded();

    let handle = std::thread::spawn(move || rx.iter().filter(|e: &SegmentEvent| e.is_discard()).count());

    let mut sink = ChannelSink::new(tx);
    let result = segmenter.segment_with_sink(&doc, &mut sink);
    drop(sink);

    let discards = handle.join().unwrap();
    assert_eq!(discards as u32, result.stats.out_of_range + result.stats.blocks_skipped);
}

#[test]
fn test_events_serialize_as_json_lines() {
    let events = collect_events(&create_sample_document());
    for event in &events {
        let line = serde_json::to_string(event).unwrap();
        assert!(line.starts_with(r#"{"event":""#));
        assert!(!line.contains('\n'));
    }
}
