//! Data model: typed cell values and row-oriented tables.

mod table;
mod value;

pub use table::DataTable;
pub use value::{floor_days, CellValue};
