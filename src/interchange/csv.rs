//! CSV export and import of shift sheets.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim, Writer};
use tracing::info;

use crate::calculation::{SHEET_HEADERS, ShiftRow, ShiftSheet};
use crate::error::{LedgerError, LedgerResult};

/// Renders the rows of `sheet` as CSV text with a header line.
pub fn sheet_to_csv(sheet: &ShiftSheet) -> LedgerResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    write_rows(&mut wtr, sheet).map_err(|e| export_error("<memory>", e))?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| export_error("<memory>", e.error()))?;
    String::from_utf8(bytes).map_err(|e| export_error("<memory>", e))
}

/// Writes the rows of `sheet` to a CSV file at `path`.
pub fn write_sheet_csv(sheet: &ShiftSheet, path: &Path) -> LedgerResult<()> {
    let shown = path.display().to_string();
    let mut wtr = Writer::from_path(path).map_err(|e| export_error(&shown, e))?;
    write_rows(&mut wtr, sheet).map_err(|e| export_error(&shown, e))?;
    info!(path = %shown, rows = sheet.rows.len(), "Exported shift sheet to CSV");
    Ok(())
}

/// Reads sheet rows from CSV.
///
/// Columns are matched by header name; missing columns and short rows read
/// as empty cells. A file that is not valid CSV is rejected as a whole.
pub fn rows_from_csv<R: Read>(reader: R) -> LedgerResult<Vec<ShiftRow>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    rdr.deserialize::<ShiftRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| LedgerError::InvalidImport {
                message: format!("row {}: {}", index + 1, e),
            })
        })
        .collect()
}

/// Reads sheet rows from a CSV file at `path`.
pub fn read_sheet_csv(path: &Path) -> LedgerResult<Vec<ShiftRow>> {
    let file = File::open(path).map_err(|e| LedgerError::InvalidImport {
        message: format!("cannot open '{}': {}", path.display(), e),
    })?;
    rows_from_csv(file)
}

fn write_rows<W: std::io::Write>(wtr: &mut Writer<W>, sheet: &ShiftSheet) -> csv::Result<()> {
    wtr.write_record(SHEET_HEADERS)?;
    for row in &sheet.rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_error(path: &str, error: impl std::fmt::Display) -> LedgerError {
    LedgerError::Export {
        path: path.to_string(),
        message: error.to_string(),
    }
}
