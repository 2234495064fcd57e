//! Document model types.
//!
//! Pages come in from a page source; blocks and units come out of the
//! segmentation engine. Nothing here outlives a single run.

mod document;
mod page;
mod segment;

pub use document::Document;
pub use page::Page;
pub use segment::{Block, ContentWindow, Material, SegmentUnit};
