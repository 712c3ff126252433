//! Markdown rendering.

use super::{average_label, month_label};
use crate::analysis::{DelaySummary, Report};
use crate::error::Result;
use crate::model::DataTable;

/// Render a report as a Markdown document.
pub fn to_markdown(report: &Report) -> Result<String> {
    let mut out = String::new();

    out.push_str("# Sheet Consolidation Report\n\n");

    if report.sheets_merged.is_empty() {
        out.push_str("No sheets matching the 'Month Year' pattern were found.\n");
        return Ok(out);
    }

    out.push_str(&format!(
        "Consolidated {} sheets: {}.\n\n",
        report.sheets_merged.len(),
        report.sheets_merged.join(", ")
    ));

    for warning in &report.warnings {
        out.push_str(&format!("> Warning: {}\n", warning));
    }
    if !report.warnings.is_empty() {
        out.push('\n');
    }

    out.push_str("## Consolidated Data\n\n");
    push_table(&mut out, &report.consolidated);

    if let Some(ref incidents) = report.incident_types {
        out.push_str("## Top Incident Types\n\n");
        out.push_str("| Incident Type | Count |\n");
        out.push_str("| --- | ---: |\n");
        for entry in &incidents.counts {
            out.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&entry.label),
                entry.count
            ));
        }
        out.push('\n');
    }

    if let Some(ref delay) = report.qa_delay {
        push_delay_section(&mut out, "Average Delay in Forwarding to QA", delay);
    }

    if let Some(ref delay) = report.forwarding_delay {
        push_delay_section(&mut out, "Average Delay in Forwarding to Shareholders", delay);
    }

    Ok(out)
}

fn push_delay_section(out: &mut String, heading: &str, delay: &DelaySummary) {
    out.push_str(&format!("## {}\n\n", heading));
    out.push_str(&format!(
        "**Average Delay (Days): {}**\n\n",
        average_label(delay.average_days)
    ));

    if !delay.monthly.is_empty() {
        out.push_str("| Month | Average Delay (Days) |\n");
        out.push_str("| --- | ---: |\n");
        for point in &delay.monthly {
            out.push_str(&format!(
                "| {} | {:.2} |\n",
                month_label(point.month),
                point.average_days
            ));
        }
        out.push('\n');
    }
}

fn push_table(out: &mut String, table: &DataTable) {
    if table.columns.is_empty() {
        out.push_str("(empty)\n\n");
        return;
    }

    let header: Vec<String> = table.columns.iter().map(|c| escape_cell(c)).collect();
    out.push_str(&format!("| {} |\n", header.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        " --- |".repeat(table.columns.len())
    ));

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|v| escape_cell(&v.display())).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out.push('\n');
}

/// Escape pipes and newlines so cell content stays inside its cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
