//! JSON rendering of segmentation results.
//!
//! The unit list is the downstream exchange format:
//!
//! ```json
//! [{"question_number": 7, "text": "..."}]
//! ```
//!
//! Answer keys use `"solution"` in place of `"text"`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::SegmentationResult;
use crate::error::{Error, Result};
use crate::model::{Material, SegmentUnit};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Render the units of a result as a JSON array.
pub fn to_json(result: &SegmentationResult, format: JsonFormat) -> Result<String> {
    units_to_json(&result.units, result.material, format)
}

/// Render units as a JSON array, keying the text by `material`.
pub fn units_to_json(units: &[SegmentUnit], material: Material, format: JsonFormat) -> Result<String> {
    let key = material.text_key();
    let records: Vec<Value> = units
        .iter()
        .map(|unit| {
            let mut record = Map::new();
            record.insert(
                "question_number".to_string(),
                Value::from(unit.sequence_number),
            );
            record.insert(key.to_string(), Value::from(unit.text.as_str()));
            Value::Object(record)
        })
        .collect();
    serialize(&records, format)
}

/// Render the whole result (window, material, units and statistics).
pub fn report_to_json(result: &SegmentationResult, format: JsonFormat) -> Result<String> {
    serialize(result, format)
}

/// Parse a unit array written by [`units_to_json`]; both text keys are accepted.
pub fn units_from_json(json: &str) -> Result<Vec<SegmentUnit>> {
    Ok(serde_json::from_str(json)?)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
