//! # sheetsum
//!
//! Workbook consolidation and incident delay analysis.
//!
//! This library reads an XLSX workbook, concatenates every sheet named like
//! "March 2025" into one table tagged with its source sheet, and produces
//! descriptive summaries: incident-type frequency counts and average
//! day-count delays between date-stamped process stages, overall and per
//! calendar month.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetsum::{analyze_file, render};
//!
//! let report = analyze_file("incidents.xlsx")?;
//! println!("merged {} sheets", report.sheets_merged.len());
//!
//! let text = render::to_text(&report)?;
//! println!("{}", text);
//! # Ok::<(), sheetsum::Error>(())
//! ```
//!
//! ## Pipeline APIs
//!
//! ```no_run
//! use sheetsum::xlsx::WorkbookParser;
//! use sheetsum::{analyze, consolidate::consolidate};
//!
//! let workbook = WorkbookParser::open("incidents.xlsx")?.parse()?;
//! let consolidated = consolidate(&workbook);
//! println!("{} rows", consolidated.table.row_count());
//!
//! let report = analyze(&workbook);
//! # Ok::<(), sheetsum::Error>(())
//! ```
//!
//! Malformed data degrades feature by feature: unparsable dates become
//! missing values, absent columns skip only their own analysis section, and
//! a workbook with no month-year sheets yields an empty report with a
//! warning rather than an error.

pub mod analysis;
pub mod consolidate;
pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod months;
pub mod render;
pub mod xlsx;

// Re-exports
pub use analysis::{analyze, DelaySpec, DelaySummary, IncidentTypeSummary, MonthlyAverage, Report};
pub use consolidate::{Consolidated, SHEET_NAME_COLUMN};
pub use container::XlsxContainer;
pub use error::{Error, Result};
pub use model::{CellValue, DataTable};
pub use months::is_month_year;
pub use xlsx::{Sheet, Workbook, WorkbookParser};

use std::path::Path;

/// Parse a workbook file into the sheet model.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    detect::verify_xlsx_path(path.as_ref())?;
    WorkbookParser::open(path)?.parse()
}

/// Parse a workbook from bytes.
pub fn workbook_from_bytes(data: &[u8]) -> Result<Workbook> {
    detect::verify_xlsx_bytes(data)?;
    WorkbookParser::from_bytes(data.to_vec())?.parse()
}

/// Run the full pipeline against a workbook file.
///
/// # Example
///
/// ```no_run
/// use sheetsum::analyze_file;
///
/// let report = analyze_file("incidents.xlsx")?;
/// for warning in &report.warnings {
///     eprintln!("warning: {}", warning);
/// }
/// # Ok::<(), sheetsum::Error>(())
/// ```
pub fn analyze_file(path: impl AsRef<Path>) -> Result<Report> {
    let workbook = open_workbook(path)?;
    Ok(analyze(&workbook))
}

/// Run the full pipeline against workbook bytes.
pub fn analyze_bytes(data: &[u8]) -> Result<Report> {
    let workbook = workbook_from_bytes(data)?;
    Ok(analyze(&workbook))
}
