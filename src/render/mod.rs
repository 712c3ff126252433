//! Output rendering for analysis reports.
//!
//! Renderers convert a [`Report`](crate::analysis::Report) to Markdown,
//! plain text with ASCII charts, or JSON.
//!
//! # Example
//!
//! ```no_run
//! use sheetsum::{analyze_file, render::*};
//!
//! let report = analyze_file("incidents.xlsx")?;
//!
//! let md = to_markdown(&report)?;
//! let text = to_text(&report)?;
//! let json = to_json(&report, JsonFormat::Pretty)?;
//! # Ok::<(), sheetsum::Error>(())
//! ```

mod json;
mod markdown;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use text::to_text;

use chrono::NaiveDate;

/// Display form of a monthly grouping key, e.g. "Mar 2025".
pub(crate) fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

/// Display form of an average with two decimal places.
pub(crate) fn average_label(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.2}", avg),
        None => "no data".to_string(),
    }
}
