//! Incident-type frequency counts.

use crate::model::{CellValue, DataTable};
use serde::{Deserialize, Serialize};

/// One (label, count) entry of the incident-type summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentCount {
    /// Incident label, exactly as it appears in the data.
    pub label: String,
    /// Number of rows carrying the label.
    pub count: usize,
}

/// Frequency counts of a categorical column, sorted descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentTypeSummary {
    /// Counts in descending order; ties keep first-encountered label order.
    pub counts: Vec<IncidentCount>,
}

impl IncidentTypeSummary {
    /// Total number of counted rows.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Largest single count, for scaling bar charts.
    pub fn max_count(&self) -> usize {
        self.counts.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

/// Count occurrences per distinct label of `column`.
///
/// Missing cells are excluded from the counts entirely; a present empty
/// string is its own bucket. Returns `None` when the column does not exist.
pub fn count_incident_types(table: &DataTable, column: &str) -> Option<IncidentTypeSummary> {
    let values = table.column(column)?;

    // First-encountered order is the tie-break, so count into an ordered
    // list rather than a map.
    let mut labels: Vec<String> = Vec::new();
    let mut tallies: Vec<usize> = Vec::new();

    for value in values {
        let label = match value {
            CellValue::Empty => continue,
            other => other.display(),
        };

        match labels.iter().position(|l| *l == label) {
            Some(i) => tallies[i] += 1,
            None => {
                labels.push(label);
                tallies.push(1);
            }
        }
    }

    let mut counts: Vec<IncidentCount> = labels
        .into_iter()
        .zip(tallies)
        .map(|(label, count)| IncidentCount { label, count })
        .collect();

    // Stable sort keeps encounter order within equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    Some(IncidentTypeSummary { counts })
}
