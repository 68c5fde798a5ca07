//! File formats for moving records in and out of the ledgers.
//!
//! - [`csv`](self::csv): shift sheets as comma-separated values, both ways
//! - [`xlsx`](self::xlsx): shift sheets as a workbook with a summary sheet, both ways
//! - [`json`](self::json): pretty-printed expense backups, both ways

pub mod csv;
pub mod json;
pub mod xlsx;

pub use self::csv::{read_sheet_csv, rows_from_csv, sheet_to_csv, write_sheet_csv};
pub use self::json::{expenses_from_json, expenses_to_json, read_expenses_json, write_expenses_json};
pub use self::xlsx::{read_sheet_xlsx, rows_from_xlsx, sheet_to_xlsx, write_sheet_xlsx};
