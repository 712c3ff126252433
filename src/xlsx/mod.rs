//! XLSX workbook reading.
//!
//! # Example
//!
//! ```no_run
//! use sheetsum::xlsx::WorkbookParser;
//!
//! let workbook = WorkbookParser::open("incidents.xlsx")?.parse()?;
//! for sheet in &workbook.sheets {
//!     println!("{}: {} rows", sheet.name, sheet.rows.len());
//! }
//! # Ok::<(), sheetsum::Error>(())
//! ```

pub mod parser;
pub mod shared_strings;
pub mod styles;

pub use parser::WorkbookParser;

use crate::model::CellValue;
use serde::{Deserialize, Serialize};

/// One named sheet: header columns plus typed data rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as declared in the workbook.
    pub name: String,
    /// Column names from the first row; generated names fill header gaps.
    pub columns: Vec<String>,
    /// Data rows, each padded to `columns.len()` values.
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a sheet with no columns and no rows.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// A parsed workbook: ordered collection of named sheets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Sheet names, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_lookup() {
        let workbook = Workbook {
            sheets: vec![Sheet::empty("March 2025"), Sheet::empty("Notes")],
        };

        assert_eq!(workbook.sheet_names(), vec!["March 2025", "Notes"]);
        assert!(workbook.sheet("Notes").is_some());
        assert!(workbook.sheet("April 2025").is_none());
    }
}
