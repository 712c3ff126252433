//! End-to-end pipeline tests over real in-memory XLSX archives.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use sheetsum::{analyze_bytes, workbook_from_bytes, CellValue, Error, SHEET_NAME_COLUMN};
use zip::write::SimpleFileOptions;

const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Column index (0-based) to an Excel column letter, single-letter range.
fn col_letter(idx: usize) -> char {
    (b'A' + idx as u8) as char
}

/// Worksheet XML from rows of inline-string cells; empty strings leave the
/// cell out entirely (a genuinely missing cell, not an empty one).
fn sheet_xml(rows: &[Vec<&str>]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><worksheet><sheetData>",
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                "<c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                col_letter(c),
                r + 1,
                value
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Assemble a complete XLSX archive from (sheet name, worksheet XML) pairs.
fn build_xlsx_from_parts(sheets: &[(&str, String)], styles_xml: Option<&str>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut part = |name: &str, content: &str| {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    };

    part(
        "[Content_Types].xml",
        &format!(
            "<?xml version=\"1.0\"?><Types><Override PartName=\"/xl/workbook.xml\" ContentType=\"{}\"/></Types>",
            WORKBOOK_CONTENT_TYPE
        ),
    );

    let mut workbook = String::from("<?xml version=\"1.0\"?><workbook><sheets>");
    let mut rels = String::from("<?xml version=\"1.0\"?><Relationships>");
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            name,
            i + 1,
            i + 1
        ));
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Target=\"worksheets/sheet{}.xml\"/>",
            i + 1,
            i + 1
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    part("xl/workbook.xml", &workbook);
    part("xl/_rels/workbook.xml.rels", &rels);
    if let Some(styles) = styles_xml {
        part("xl/styles.xml", styles);
    }
    for (i, (_, xml)) in sheets.iter().enumerate() {
        part(&format!("xl/worksheets/sheet{}.xml", i + 1), xml);
    }

    writer.finish().unwrap().into_inner()
}

fn build_xlsx(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let parts: Vec<(&str, String)> = sheets
        .iter()
        .map(|(name, rows)| (*name, sheet_xml(rows)))
        .collect();
    build_xlsx_from_parts(&parts, None)
}

#[test]
fn consolidates_matching_sheets_in_workbook_order() {
    let data = build_xlsx(&[
        (
            "March 2025",
            vec![vec!["Incident Type"], vec!["Outage"], vec!["Breach"]],
        ),
        ("Notes", vec![vec!["Incident Type"], vec!["ignored"]]),
        ("April 2025", vec![vec!["Incident Type"], vec!["Outage"]]),
    ]);

    let report = analyze_bytes(&data).unwrap();
    assert_eq!(report.sheets_merged, vec!["March 2025", "April 2025"]);

    let table = &report.consolidated;
    assert_eq!(table.row_count(), 3);
    for (row, expected) in [(0, "March 2025"), (1, "March 2025"), (2, "April 2025")] {
        assert_eq!(
            table.cell(row, SHEET_NAME_COLUMN),
            &CellValue::Text(expected.to_string())
        );
    }

    let incidents = report.incident_types.unwrap();
    let pairs: Vec<_> = incidents
        .counts
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(pairs, vec![("Outage", 2), ("Breach", 1)]);
}

#[test]
fn computes_delays_and_monthly_averages() {
    let data = build_xlsx(&[(
        "March 2025",
        vec![
            vec![
                "Incident Type",
                "Date",
                "Incident Received by QA on",
                "Incident forwarded on",
            ],
            vec!["Outage", "2025-03-02", "2025-03-04", "2025-03-05"],
            vec!["Breach", "2025-03-20", "2025-03-24", "2025-03-25"],
            // QA date precedes the incident date: negative, preserved
            vec!["Outage", "2025-04-05", "2025-04-01", "2025-04-02"],
            // Unparsable end date: excluded from both analyses' rows
            vec!["Outage", "2025-04-10", "pending", ""],
        ],
    )]);

    let report = analyze_bytes(&data).unwrap();
    assert!(report.warnings.is_empty());

    let qa = report.qa_delay.unwrap();
    // Delays 2, 4, -4 over three usable rows
    assert_eq!(qa.average_days, Some(2.0 / 3.0));

    let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    assert_eq!(qa.monthly.len(), 2);
    assert_eq!(qa.monthly[0].month, march);
    assert_eq!(qa.monthly[0].average_days, 3.0);
    assert_eq!(qa.monthly[1].month, april);
    assert_eq!(qa.monthly[1].average_days, -4.0);

    let forwarding = report.forwarding_delay.unwrap();
    // Delays 1, 1, 1; monthly key comes from the QA-received column
    assert_eq!(forwarding.average_days, Some(1.0));
    assert_eq!(forwarding.monthly.len(), 2);
    assert_eq!(forwarding.monthly[0].month, march);
    assert_eq!(forwarding.monthly[1].month, april);
}

#[test]
fn no_matching_sheets_degrades_with_warning() {
    let data = build_xlsx(&[("Invoices", vec![vec!["Amount"], vec!["10"]])]);

    let report = analyze_bytes(&data).unwrap();
    assert!(report.sheets_merged.is_empty());
    assert!(report.consolidated.is_empty());
    assert!(report.incident_types.is_none());
    assert!(report.qa_delay.is_none());
    assert!(report.forwarding_delay.is_none());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Month Year"));
}

#[test]
fn analysis_sections_skip_independently() {
    // One matching sheet with none of the expected analysis columns
    let data = build_xlsx(&[
        ("January 2025", vec![vec!["Notes"], vec!["all quiet"]]),
        ("Invoices", vec![vec!["Amount"], vec!["10"]]),
    ]);

    let report = analyze_bytes(&data).unwrap();
    assert_eq!(report.sheets_merged, vec!["January 2025"]);
    assert_eq!(report.consolidated.row_count(), 1);
    assert!(report.incident_types.is_none());
    assert!(report.qa_delay.is_none());
    assert!(report.forwarding_delay.is_none());
    assert_eq!(report.warnings.len(), 3);
}

#[test]
fn column_union_across_sheets() {
    let data = build_xlsx(&[
        ("March 2025", vec![vec!["Incident Type"], vec!["Outage"]]),
        ("April 2025", vec![vec!["Severity"], vec!["High"]]),
    ]);

    let report = analyze_bytes(&data).unwrap();
    let table = &report.consolidated;
    assert_eq!(
        table.columns,
        vec!["Incident Type", "Severity", SHEET_NAME_COLUMN]
    );
    assert_eq!(table.cell(0, "Severity"), &CellValue::Empty);
    assert_eq!(table.cell(1, "Incident Type"), &CellValue::Empty);
}

#[test]
fn date_styled_serial_cells_parse_as_dates() {
    let styles = r#"<?xml version="1.0"?><styleSheet>
        <cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs>
    </styleSheet>"#;

    // Serial 45658 = 2025-01-01, serial 45660 = 2025-01-03
    let sheet = concat!(
        "<?xml version=\"1.0\"?><worksheet><sheetData>",
        "<row r=\"1\">",
        "<c r=\"A1\" t=\"inlineStr\"><is><t>Date</t></is></c>",
        "<c r=\"B1\" t=\"inlineStr\"><is><t>Incident Received by QA on</t></is></c>",
        "</row>",
        "<row r=\"2\">",
        "<c r=\"A2\" s=\"1\"><v>45658</v></c>",
        "<c r=\"B2\" s=\"1\"><v>45660</v></c>",
        "</row>",
        "</sheetData></worksheet>"
    )
    .to_string();

    let data = build_xlsx_from_parts(&[("June 2025", sheet)], Some(styles));
    let report = analyze_bytes(&data).unwrap();

    let qa = report.qa_delay.unwrap();
    assert_eq!(qa.average_days, Some(2.0));
    assert_eq!(
        qa.monthly[0].month,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    );
}

#[test]
fn oversized_cell_references_degrade_gracefully() {
    // A reference far past Excel's XFD column limit must not abort or
    // attempt a giant row allocation; the cell just loses its position.
    let sheet = concat!(
        "<?xml version=\"1.0\"?><worksheet><sheetData>",
        "<row r=\"1\">",
        "<c r=\"A1\" t=\"inlineStr\"><is><t>Incident Type</t></is></c>",
        "</row>",
        "<row r=\"2\">",
        "<c r=\"AAAAAAAAAAAAAA2\" t=\"inlineStr\"><is><t>Outage</t></is></c>",
        "</row>",
        "</sheetData></worksheet>"
    )
    .to_string();

    let data = build_xlsx_from_parts(&[("March 2025", sheet)], None);
    let report = analyze_bytes(&data).unwrap();

    assert_eq!(report.sheets_merged, vec!["March 2025"]);
    let incidents = report.incident_types.unwrap();
    assert_eq!(incidents.counts[0].label, "Outage");
}

#[test]
fn analyze_twice_yields_identical_results() {
    let data = build_xlsx(&[(
        "March 2025",
        vec![
            vec!["Date", "Incident Received by QA on"],
            vec!["2025-03-01", "2025-03-05"],
        ],
    )]);

    let first = analyze_bytes(&data).unwrap();
    let second = analyze_bytes(&data).unwrap();
    assert_eq!(
        first.qa_delay.as_ref().unwrap().average_days,
        second.qa_delay.as_ref().unwrap().average_days
    );
    assert_eq!(
        first.qa_delay.as_ref().unwrap().monthly,
        second.qa_delay.as_ref().unwrap().monthly
    );
}

#[test]
fn rejects_input_that_is_not_a_workbook() {
    let err = analyze_bytes(b"definitely not a zip").unwrap_err();
    assert!(matches!(err, Error::NotXlsx(_)));
}

#[test]
fn analyze_file_via_path() {
    let data = build_xlsx(&[(
        "March 2025",
        vec![vec!["Incident Type"], vec!["Outage"]],
    )]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incidents.xlsx");
    std::fs::write(&path, &data).unwrap();

    let report = sheetsum::analyze_file(&path).unwrap();
    assert_eq!(report.sheets_merged, vec!["March 2025"]);
}

#[test]
fn workbook_model_preserves_sheet_order() {
    let data = build_xlsx(&[
        ("Summary", vec![vec!["A"]]),
        ("March 2025", vec![vec!["A"], vec!["1"]]),
        ("April 2025", vec![vec!["A"], vec!["2"]]),
    ]);

    let workbook = workbook_from_bytes(&data).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Summary", "March 2025", "April 2025"]
    );
}
