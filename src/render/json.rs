//! JSON rendering for extraction results and failures.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{ExtractionResult, ExtractionStats, Failure};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert an extraction result to JSON (`text`, `numPages`, `fileName`).
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    serialize(result, format)
}

/// Convert a failure to JSON (`kind`, `message`, `hint`).
pub fn failure_to_json(error: &Error, format: JsonFormat) -> Result<String> {
    serialize(&Failure::from(error), format)
}

/// Convert extraction statistics to JSON.
pub fn stats_to_json(stats: &ExtractionStats, format: JsonFormat) -> Result<String> {
    serialize(stats, format)
}
