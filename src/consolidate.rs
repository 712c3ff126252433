//! Consolidation of month-year sheets into one table.

use crate::model::{CellValue, DataTable};
use crate::months::is_month_year;
use crate::xlsx::Workbook;
use serde::{Deserialize, Serialize};

/// Name of the column tagging each consolidated row with its source sheet.
pub const SHEET_NAME_COLUMN: &str = "Sheet Name";

/// The consolidated table plus the names of the sheets that fed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Consolidated {
    /// Row-wise union of all month-year sheets, tagged with "Sheet Name".
    pub table: DataTable,
    /// Names of the merged sheets, in workbook order.
    pub sheets_merged: Vec<String>,
}

impl Consolidated {
    /// Check whether any sheet matched the month-year filter.
    pub fn is_empty(&self) -> bool {
        self.sheets_merged.is_empty()
    }
}

/// Concatenate every month-year sheet of the workbook into one table.
///
/// Sheets are taken in workbook order; rows keep their source order. The
/// column set is the union across the merged sheets in first-seen order,
/// with a trailing "Sheet Name" column; a column absent from a sheet yields
/// missing values for that sheet's rows.
pub fn consolidate(workbook: &Workbook) -> Consolidated {
    let selected: Vec<_> = workbook
        .sheets
        .iter()
        .filter(|s| is_month_year(&s.name))
        .collect();

    if selected.is_empty() {
        log::debug!("no month-year sheets in workbook");
        return Consolidated::default();
    }

    // Column union in first-seen order, sheet tag last. A source column
    // already named "Sheet Name" is folded into the tag column, which the
    // sheet name then overwrites.
    let mut columns: Vec<String> = Vec::new();
    for sheet in &selected {
        for col in &sheet.columns {
            if col != SHEET_NAME_COLUMN && !columns.contains(col) {
                columns.push(col.clone());
            }
        }
    }
    columns.push(SHEET_NAME_COLUMN.to_string());

    let mut table = DataTable::with_columns(columns);
    let mut sheets_merged = Vec::with_capacity(selected.len());

    for sheet in &selected {
        // Source column -> consolidated column position
        let mapping: Vec<Option<usize>> = sheet
            .columns
            .iter()
            .map(|c| table.column_index(c))
            .collect();
        let tag = table.column_count() - 1;

        for row in &sheet.rows {
            let mut out = vec![CellValue::Empty; table.column_count()];
            for (src, value) in row.iter().enumerate() {
                if let Some(Some(dst)) = mapping.get(src) {
                    out[*dst] = value.clone();
                }
            }
            out[tag] = CellValue::Text(sheet.name.clone());
            table.push_row(out);
        }

        sheets_merged.push(sheet.name.clone());
    }

    log::debug!(
        "consolidated {} sheets into {} rows",
        sheets_merged.len(),
        table.row_count()
    );

    Consolidated {
        table,
        sheets_merged,
    }
}
