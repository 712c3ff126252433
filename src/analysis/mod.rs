//! Analysis pipeline: consolidation plus the optional summary sections.
//!
//! Each section independently checks for its required columns and degrades
//! with a warning; one absent column never blocks the other sections.

pub mod delay;
pub mod incidents;

pub use delay::{analyze_delay, DelaySpec, DelaySummary, MonthlyAverage};
pub use incidents::{count_incident_types, IncidentCount, IncidentTypeSummary};

use crate::consolidate::{consolidate, Consolidated};
use crate::model::DataTable;
use crate::xlsx::Workbook;
use serde::{Deserialize, Serialize};

/// Categorical incident label column.
pub const COL_INCIDENT_TYPE: &str = "Incident Type";
/// Incident occurrence date column.
pub const COL_DATE: &str = "Date";
/// Date the incident reached QA.
pub const COL_RECEIVED_BY_QA: &str = "Incident Received by QA on";
/// Date the incident was forwarded onward.
pub const COL_FORWARDED_ON: &str = "Incident forwarded on";

/// Full analysis result for one workbook run.
///
/// Optional sections are `None` when their required columns were absent or
/// no sheet matched; every such degradation leaves a warning behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Names of the merged month-year sheets, in workbook order.
    pub sheets_merged: Vec<String>,
    /// The consolidated table (empty when nothing matched).
    pub consolidated: DataTable,
    /// Incident-type frequency counts.
    pub incident_types: Option<IncidentTypeSummary>,
    /// Delay from incident date to QA reception.
    pub qa_delay: Option<DelaySummary>,
    /// Delay from QA reception to forwarding.
    pub forwarding_delay: Option<DelaySummary>,
    /// Warnings accumulated while degrading sections, in emission order.
    pub warnings: Vec<String>,
}

/// The spec of the incident-date-to-QA delay analysis.
pub fn qa_delay_spec() -> DelaySpec {
    DelaySpec::new(
        "Forwarding Delay to QA (Days)",
        COL_DATE,
        COL_RECEIVED_BY_QA,
    )
}

/// The spec of the QA-to-forwarding delay analysis.
pub fn forwarding_delay_spec() -> DelaySpec {
    DelaySpec::new(
        "Forwarding Delay to Shareholders (Days)",
        COL_RECEIVED_BY_QA,
        COL_FORWARDED_ON,
    )
}

/// Run the full pipeline over a parsed workbook.
///
/// Pure function of its input: calling it twice on the same workbook yields
/// identical reports, and the two delay analyses share only the read-only
/// consolidated table.
pub fn analyze(workbook: &Workbook) -> Report {
    let Consolidated {
        table,
        sheets_merged,
    } = consolidate(workbook);

    let mut report = Report {
        sheets_merged,
        consolidated: table,
        ..Default::default()
    };

    if report.sheets_merged.is_empty() {
        push_warning(
            &mut report,
            "No sheets matching the 'Month Year' pattern were found.",
        );
        return report;
    }

    report.incident_types = count_incident_types(&report.consolidated, COL_INCIDENT_TYPE);
    if report.incident_types.is_none() {
        push_warning(
            &mut report,
            &format!("Column '{}' not found in the data.", COL_INCIDENT_TYPE),
        );
    }

    report.qa_delay = analyze_delay(&report.consolidated, &qa_delay_spec());
    if report.qa_delay.is_none() {
        push_warning(
            &mut report,
            &format!(
                "Columns '{}' and '{}' are required for the QA delay analysis.",
                COL_DATE, COL_RECEIVED_BY_QA
            ),
        );
    }

    report.forwarding_delay = analyze_delay(&report.consolidated, &forwarding_delay_spec());
    if report.forwarding_delay.is_none() {
        push_warning(
            &mut report,
            &format!(
                "Columns '{}' and '{}' are required for the forwarding delay analysis.",
                COL_RECEIVED_BY_QA, COL_FORWARDED_ON
            ),
        );
    }

    report
}

fn push_warning(report: &mut Report, message: &str) {
    log::warn!("{}", message);
    report.warnings.push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use crate::xlsx::Sheet;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn incident_sheet(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            columns: vec![
                COL_INCIDENT_TYPE.to_string(),
                COL_DATE.to_string(),
                COL_RECEIVED_BY_QA.to_string(),
                COL_FORWARDED_ON.to_string(),
            ],
            rows: vec![vec![
                text("Outage"),
                text("2025-03-01"),
                text("2025-03-03"),
                text("2025-03-06"),
            ]],
        }
    }

    #[test]
    fn test_full_report() {
        let workbook = Workbook {
            sheets: vec![incident_sheet("March 2025")],
        };

        let report = analyze(&workbook);
        assert_eq!(report.sheets_merged, vec!["March 2025"]);
        assert!(report.warnings.is_empty());

        let incidents = report.incident_types.unwrap();
        assert_eq!(incidents.counts[0].label, "Outage");

        assert_eq!(report.qa_delay.unwrap().average_days, Some(2.0));
        assert_eq!(report.forwarding_delay.unwrap().average_days, Some(3.0));
    }

    #[test]
    fn test_no_matching_sheets_skips_everything() {
        let workbook = Workbook {
            sheets: vec![incident_sheet("Invoices")],
        };

        let report = analyze(&workbook);
        assert!(report.sheets_merged.is_empty());
        assert!(report.consolidated.is_empty());
        assert!(report.incident_types.is_none());
        assert!(report.qa_delay.is_none());
        assert!(report.forwarding_delay.is_none());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_sections_degrade_independently() {
        let sheet = Sheet {
            name: "January 2025".to_string(),
            columns: vec![COL_INCIDENT_TYPE.to_string()],
            rows: vec![vec![text("Breach")]],
        };
        let workbook = Workbook {
            sheets: vec![sheet],
        };

        let report = analyze(&workbook);
        assert!(report.incident_types.is_some());
        assert!(report.qa_delay.is_none());
        assert!(report.forwarding_delay.is_none());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let workbook = Workbook {
            sheets: vec![incident_sheet("March 2025")],
        };

        let first = analyze(&workbook);
        let second = analyze(&workbook);
        assert_eq!(
            first.qa_delay.as_ref().unwrap().average_days,
            second.qa_delay.as_ref().unwrap().average_days
        );
        assert_eq!(
            first.forwarding_delay.as_ref().unwrap().monthly,
            second.forwarding_delay.as_ref().unwrap().monthly
        );
    }
}
