//! Typed cell values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Text date formats tried, in order, when coercing a text cell to a date.
///
/// m/d before d/m mirrors the default inference order of common spreadsheet
/// tooling; first successful parse wins.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%b-%Y", "%B %d, %Y"];

/// A single value read from a worksheet cell.
///
/// `Empty` is the explicit missing marker: blank cells, gaps left by sparse
/// rows, and columns absent from a source sheet all surface as `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellValue {
    /// Missing value.
    Empty,
    /// Text content (shared, inline, or formula-cached strings).
    Text(String),
    /// Numeric content.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Date-time content, resolved from a date-formatted serial number.
    DateTime(NaiveDateTime),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Check whether this value is the missing marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Coerce this value to a date-time.
    ///
    /// Typed date cells pass through. Text cells are tried against a fixed
    /// ordered list of formats. Anything unparsable is `None`, never an
    /// error; missingness propagates into the delay computations.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(s) => parse_datetime_text(s.trim()),
            _ => None,
        }
    }

    /// Render the value for tabular display. `Empty` renders as "".
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            CellValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
                }
            }
        }
    }
}

/// Parse a text date using the fixed format list.
fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DAY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?);
        }
    }

    None
}

/// Signed whole-day difference between two date-times, floored.
///
/// Flooring (rather than truncating toward zero) keeps partial days
/// consistent across signs: 23 hours forward is 0 days, 23 hours backward
/// is -1 day.
pub fn floor_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().div_euclid(86_400)
}
