//! Plain-text rendering with ASCII charts.

use super::{average_label, month_label};
use crate::analysis::{DelaySummary, IncidentTypeSummary, Report};
use crate::error::Result;
use crate::model::DataTable;

/// Width of the widest chart bar, in characters.
const BAR_WIDTH: usize = 40;

/// Render a report as plain text, with ASCII bar charts standing in for the
/// bar and line charts of a graphical surface.
pub fn to_text(report: &Report) -> Result<String> {
    let mut out = String::new();

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
        out.push_str(&format!("Warning: {}\n", warning));
    }
    if !report.warnings.is_empty() {
        out.push('\n');
    }

    out.push_str("Consolidated Data\n");
    out.push_str(&"-".repeat(40));
    out.push('\n');
    push_table(&mut out, &report.consolidated);

    if let Some(ref incidents) = report.incident_types {
        out.push_str("Top Incident Types\n");
        out.push_str(&"-".repeat(40));
        out.push('\n');
        push_incident_chart(&mut out, incidents);
    }

    if let Some(ref delay) = report.qa_delay {
        push_delay_section(&mut out, "Average Delay in Forwarding to QA", delay);
    }

    if let Some(ref delay) = report.forwarding_delay {
        push_delay_section(&mut out, "Average Delay in Forwarding to Shareholders", delay);
    }

    Ok(out)
}

/// Bar chart of incident counts, widest label left-aligned, bars scaled to
/// the largest count.
fn push_incident_chart(out: &mut String, incidents: &IncidentTypeSummary) {
    let label_width = incidents
        .counts
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = incidents.max_count().max(1);

    for entry in &incidents.counts {
        let bar_len = entry.count * BAR_WIDTH / max_count;
        out.push_str(&format!(
            "{:<width$}  {} {}\n",
            entry.label,
            "#".repeat(bar_len.max(1)),
            entry.count,
            width = label_width
        ));
    }
    out.push('\n');
}

fn push_delay_section(out: &mut String, heading: &str, delay: &DelaySummary) {
    out.push_str(&format!("{}\n", heading));
    out.push_str(&"-".repeat(40));
    out.push('\n');
    out.push_str(&format!(
        "Average Delay (Days): {}\n\n",
        average_label(delay.average_days)
    ));

    if delay.monthly.is_empty() {
        return;
    }

    // Month-wise averages as scaled bars; negative averages get a '-' bar
    let max_abs = delay
        .monthly
        .iter()
        .map(|p| p.average_days.abs())
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    for point in &delay.monthly {
        let bar_len = ((point.average_days.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
        let bar_char = if point.average_days < 0.0 { '-' } else { '*' };
        out.push_str(&format!(
            "{}  {} {:.2}\n",
            month_label(point.month),
            std::iter::repeat(bar_char).take(bar_len.max(1)).collect::<String>(),
            point.average_days
        ));
    }
    out.push('\n');
}

/// Column-aligned table, missing values rendered as empty cells.
fn push_table(out: &mut String, table: &DataTable) {
    if table.columns.is_empty() {
        out.push_str("(empty)\n\n");
        return;
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.display()).collect())
        .collect();

    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    for row in &rendered {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths.get(i).copied().unwrap_or(0)))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::model::CellValue;
    use crate::xlsx::{Sheet, Workbook};

    fn text_cell(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn workbook() -> Workbook {
        Workbook {
            sheets: vec![Sheet {
                name: "March 2025".to_string(),
                columns: vec![
                    "Incident Type".to_string(),
                    "Date".to_string(),
                    "Incident Received by QA on".to_string(),
                ],
                rows: vec![
                    vec![text_cell("Outage"), text_cell("2025-03-01"), text_cell("2025-03-03")],
                    vec![text_cell("Outage"), text_cell("2025-03-10"), text_cell("2025-03-12")],
                    vec![text_cell("Breach"), text_cell("2025-03-11"), text_cell("2025-03-15")],
                ],
            }],
        }
    }

    #[test]
    fn test_text_report_sections() {
        let report = analyze(&workbook());
        let text = to_text(&report).unwrap();

        assert!(text.contains("Consolidated 1 sheets: March 2025."));
        assert!(text.contains("Top Incident Types"));
        assert!(text.contains("Average Delay in Forwarding to QA"));
        // Forwarding column is absent, so that section degrades
        assert!(text.contains("Warning:"));
    }

    #[test]
    fn test_incident_bars_scale() {
        let report = analyze(&workbook());
        let text = to_text(&report).unwrap();

        // Outage (2) gets the full-width bar, Breach (1) half of it
        let outage_line = text
            .lines()
            .find(|l| l.starts_with("Outage") && l.contains('#'))
            .expect("outage bar line");
        let breach_line = text
            .lines()
            .find(|l| l.starts_with("Breach") && l.contains('#'))
            .expect("breach bar line");
        let bars = |l: &str| l.chars().filter(|&c| c == '#').count();
        assert_eq!(bars(outage_line), BAR_WIDTH);
        assert_eq!(bars(breach_line), BAR_WIDTH / 2);
    }

    #[test]
    fn test_no_match_text() {
        let report = analyze(&Workbook {
            sheets: vec![Sheet::empty("Invoices")],
        });
        let text = to_text(&report).unwrap();
        assert!(text.contains("No sheets matching"));
    }
}
