//! Row-oriented table model.

use super::CellValue;
use serde::{Deserialize, Serialize};

/// A row-oriented table: named columns plus rows of typed cell values.
///
/// Rows are kept at the declared column width; cells beyond a source row's
/// extent are the missing marker, so lookups never go out of bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows, each padded to `columns.len()` values.
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Create an empty table with the given columns.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padding or leaving it as-is to the table width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), CellValue::Empty);
        }
        self.rows.push(row);
    }

    /// Get a cell by row index and column name. Missing cells are `Empty`.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        let Some(col) = self.column_index(column) else {
            return &EMPTY;
        };
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Iterate the values of one column, row by row.
    ///
    /// Returns `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(move |r| r.get(idx).unwrap_or(&CellValue::Empty)),
        )
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
