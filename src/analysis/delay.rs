//! Delay analysis between two date-stamped process stages.

use crate::model::{floor_days, DataTable};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of one delay analysis: a label and a start/end column pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelaySpec {
    /// Human-readable label, e.g. "Forwarding Delay to QA (Days)".
    pub label: String,
    /// Column holding the start of the interval.
    pub start_column: String,
    /// Column holding the end of the interval.
    pub end_column: String,
}

impl DelaySpec {
    /// Create a delay spec.
    pub fn new(label: &str, start_column: &str, end_column: &str) -> Self {
        Self {
            label: label.to_string(),
            start_column: start_column.to_string(),
            end_column: end_column.to_string(),
        }
    }
}

/// Average delay for one calendar month of start dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverage {
    /// First day of the month the group belongs to.
    pub month: NaiveDate,
    /// Mean delay in days over the month's non-missing values.
    pub average_days: f64,
}

/// Result of one delay analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelaySummary {
    /// The spec this summary was computed from.
    pub spec: DelaySpec,
    /// Mean delay over all non-missing rows; `None` when no row had both
    /// dates.
    pub average_days: Option<f64>,
    /// Per-month averages keyed by the start column's month, chronological.
    pub monthly: Vec<MonthlyAverage>,
}

/// Compute per-row delays and their overall and monthly averages.
///
/// Each call re-reads and re-parses the date columns; nothing is cached on
/// the table, so independent analyses over the same table cannot interfere.
/// Returns `None` when either column is absent.
pub fn analyze_delay(table: &DataTable, spec: &DelaySpec) -> Option<DelaySummary> {
    if !table.has_column(&spec.start_column) || !table.has_column(&spec.end_column) {
        return None;
    }

    let mut sum: i64 = 0;
    let mut count: usize = 0;
    let mut by_month: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();

    for row in 0..table.row_count() {
        let start = table.cell(row, &spec.start_column).as_datetime();
        let end = table.cell(row, &spec.end_column).as_datetime();

        let (Some(start), Some(end)) = (start, end) else {
            // Either side unparsable or missing: the row is excluded from
            // numerator and denominator alike.
            continue;
        };

        let delay = floor_days(start, end);
        sum += delay;
        count += 1;

        let month = truncate_to_month(start);
        let entry = by_month.entry(month).or_insert((0, 0));
        entry.0 += delay;
        entry.1 += 1;
    }

    let average_days = if count > 0 {
        Some(sum as f64 / count as f64)
    } else {
        None
    };

    let monthly = by_month
        .into_iter()
        .map(|(month, (total, n))| MonthlyAverage {
            month,
            average_days: total as f64 / n as f64,
        })
        .collect();

    Some(DelaySummary {
        spec: spec.clone(),
        average_days,
        monthly,
    })
}

/// First day of the month of a date-time.
fn truncate_to_month(dt: NaiveDateTime) -> NaiveDate {
    NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1).expect("month start is a valid date")
}
