//! JSON rendering.

use crate::analysis::Report;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Indented output.
    Pretty,
    /// Single-line output.
    Compact,
}

/// Serialize a report to JSON.
pub fn to_json(report: &Report, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(report),
        JsonFormat::Compact => serde_json::to_string(report),
    };
    result.map_err(|e| Error::Render(e.to_string()))
}
