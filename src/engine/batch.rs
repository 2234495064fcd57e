//! Parallel processing of many papers.
//!
//! Each document is an independent run; a shared [`Segmenter`] is borrowed by
//! every rayon worker. A file that cannot be read fails its own outcome only.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::Segmenter;
use crate::error::Result;
use crate::render::{SegmentationResult, SegmentationStats};
use crate::source::PageSource;

/// Outcome of segmenting one file in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Input path
    pub path: PathBuf,

    /// Segmentation result, or the error that stopped this file
    pub result: Result<SegmentationResult>,
}

impl BatchOutcome {
    /// Check if the file was segmented.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Segmenter {
    /// Segment every file in `paths` in parallel.
    ///
    /// Outcomes are returned in input order.
    pub fn segment_paths<P>(&self, paths: &[P]) -> Vec<BatchOutcome>
    where
        P: AsRef<Path> + Sync,
    {
        self.segment_paths_with_progress(paths, |_| {})
    }

    /// Segment every file in `paths` in parallel, calling `on_done` as each
    /// file finishes (from the worker thread, in completion order).
    pub fn segment_paths_with_progress<P, F>(&self, paths: &[P], on_done: F) -> Vec<BatchOutcome>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&BatchOutcome) + Sync,
    {
        log::debug!("Segmenting {} files", paths.len());
        paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                let outcome = BatchOutcome {
                    path: path.to_path_buf(),
                    result: self.segment_path(path),
                };
                if let Err(e) = &outcome.result {
                    log::warn!("Failed to segment {}: {}", path.display(), e);
                }
                on_done(&outcome);
                outcome
            })
            .collect()
    }

    /// Segment in-memory sources in parallel, preserving order.
    pub fn segment_documents<S>(&self, sources: &[S]) -> Vec<SegmentationResult>
    where
        S: PageSource + Sync,
    {
        sources
            .par_iter()
            .map(|source| self.segment(source))
            .collect()
    }
}

/// Sum the statistics of every successful outcome.
pub fn total_stats(outcomes: &[BatchOutcome]) -> SegmentationStats {
    let mut total = SegmentationStats::new();
    for outcome in outcomes {
        if let Ok(result) = &outcome.result {
            total.merge(&result.stats);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SegmenterConfig;
    use crate::model::Document;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_segment_documents_preserves_order() {
        let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
        let docs: Vec<Document> = (1..=8)
            .map(|n| Document::from_texts([format!("Question {} Define pH.", n)]))
            .collect();

        let results = segmenter.segment_documents(&docs);
        let firsts: Vec<u32> = results.iter().map(|r| r.sequence_numbers()[0]).collect();
        assert_eq!(firsts, (1..=8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_missing_file_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("paper.txt");
        std::fs::write(&good, "Question 1 Define pH.\u{c}Question 2 Name a breed.").unwrap();
        let missing = dir.path().join("missing.txt");

        let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
        let done = AtomicUsize::new(0);
        let outcomes = segmenter.segment_paths_with_progress(&[good.clone(), missing], |_| {
            done.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert_eq!(outcomes[0].path, good);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());

        let total = total_stats(&outcomes);
        assert_eq!(total.blocks_accepted, 2);
    }
}
