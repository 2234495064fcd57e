//! Rendering module for segmentation output.

mod json;
mod result;

pub use json::{report_to_json, to_json, units_from_json, units_to_json, JsonFormat};
pub use result::{SegmentationResult, SegmentationStats};
