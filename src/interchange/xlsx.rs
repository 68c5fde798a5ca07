//! XLSX export and import of shift sheets.
//!
//! The workbook has two worksheets: `Summary` with the covered shift count
//! and monthly salary, then `Shifts <Month>` with one row per record.
//! Import reads the rows back from the first `Shifts` worksheet.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, DataType, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet, XlsxError,
};
use tracing::{debug, info};

use crate::calculation::{SHEET_HEADERS, ShiftRow, ShiftSheet};
use crate::error::{LedgerError, LedgerResult};

const SUMMARY_SHEET: &str = "Summary";
const ROWS_SHEET_PREFIX: &str = "Shifts";
const HEADER_BACKGROUND: u32 = 0x2F75B5;
const BAND_BACKGROUND: u32 = 0xEAF3FB;
const PLAIN_BACKGROUND: u32 = 0xFFFFFF;
// Columns written as numbers when the cell parses: Extra Hours, Salary.
const NUMERIC_COLUMNS: [usize; 2] = [5, 7];

/// Writes `sheet` as a workbook to `path`.
///
/// `currency` labels the salary line of the summary, e.g. "Rs".
pub fn write_sheet_xlsx(sheet: &ShiftSheet, currency: &str, path: &Path) -> LedgerResult<()> {
    let shown = path.display().to_string();
    let mut workbook = build_workbook(sheet, currency).map_err(|e| export_error(&shown, e))?;
    workbook.save(path).map_err(|e| export_error(&shown, e))?;
    info!(path = %shown, rows = sheet.rows.len(), "Exported shift sheet to XLSX");
    Ok(())
}

/// Renders `sheet` as workbook bytes.
pub fn sheet_to_xlsx(sheet: &ShiftSheet, currency: &str) -> LedgerResult<Vec<u8>> {
    let mut workbook = build_workbook(sheet, currency).map_err(|e| export_error("<memory>", e))?;
    workbook
        .save_to_buffer()
        .map_err(|e| export_error("<memory>", e))
}

/// Reads sheet rows from workbook bytes.
///
/// The rows come from the first worksheet named `Shifts...`, or failing that
/// the first worksheet that is not `Summary`. Columns are matched by header
/// name and fully blank lines are skipped.
pub fn rows_from_xlsx(bytes: &[u8]) -> LedgerResult<Vec<ShiftRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(import_error)?;
    read_rows(&mut workbook)
}

/// Reads sheet rows from a workbook file at `path`.
pub fn read_sheet_xlsx(path: &Path) -> LedgerResult<Vec<ShiftRow>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LedgerError::InvalidImport {
        message: format!("cannot open '{}': {}", path.display(), e),
    })?;
    read_rows(&mut workbook)
}

fn read_rows<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> LedgerResult<Vec<ShiftRow>> {
    let names = workbook.sheet_names();
    let name = names
        .iter()
        .find(|name| name.starts_with(ROWS_SHEET_PREFIX))
        .or_else(|| names.iter().find(|name| name.as_str() != SUMMARY_SHEET))
        .cloned()
        .ok_or_else(|| LedgerError::InvalidImport {
            message: "workbook has no shift worksheet".to_string(),
        })?;

    let range = workbook.worksheet_range(&name).map_err(import_error)?;
    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(cell_text).collect();

    let rows: Vec<ShiftRow> = lines
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .map(|cells| ShiftRow::from_cells(&headers, cells))
        .collect();
    debug!(sheet = %name, rows = rows.len(), "Read shift rows from workbook");
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| date.to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}

fn import_error(error: impl std::fmt::Display) -> LedgerError {
    LedgerError::InvalidImport {
        message: error.to_string(),
    }
}

fn build_workbook(sheet: &ShiftSheet, currency: &str) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(summary_worksheet(sheet, currency)?);
    workbook.push_worksheet(rows_worksheet(sheet)?);
    Ok(workbook)
}

fn summary_worksheet(sheet: &ShiftSheet, currency: &str) -> Result<Worksheet, XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SUMMARY_SHEET)?;

    let label = Format::new().set_bold();
    let salary_label = format!("Monthly Salary ({})", currency);

    worksheet.write_with_format(0, 0, "Total Covered Shifts", &label)?;
    worksheet.write(0, 1, sheet.summary.covered_shift_count as f64)?;
    worksheet.write_with_format(1, 0, salary_label.as_str(), &label)?;
    worksheet.write(1, 1, sheet.summary.monthly_salary.to_f64().unwrap_or_default())?;

    worksheet.set_column_width(0, salary_label.len().max(20) as f64 + 2.0)?;
    Ok(worksheet)
}

fn rows_worksheet(sheet: &ShiftSheet) -> Result<Worksheet, XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(sheet.sheet_name())?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(PLAIN_BACKGROUND))
        .set_background_color(Color::RGB(HEADER_BACKGROUND))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in SHEET_HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut widths: Vec<usize> = SHEET_HEADERS.iter().map(|h| h.len()).collect();

    for (index, row) in sheet.rows.iter().enumerate() {
        let line = (index + 1) as u32;
        let background = if index % 2 == 0 { BAND_BACKGROUND } else { PLAIN_BACKGROUND };

        for (col, value) in row.cells().iter().enumerate() {
            write_cell(&mut worksheet, line, col, value, background)?;
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }
    Ok(worksheet)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: usize,
    value: &str,
    background: u32,
) -> Result<(), XlsxError> {
    let format = Format::new()
        .set_background_color(Color::RGB(background))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if NUMERIC_COLUMNS.contains(&col) {
        if let Ok(number) = value.parse::<f64>() {
            let format = format.set_align(FormatAlign::Right);
            worksheet.write_with_format(row, col as u16, number, &format)?;
            return Ok(());
        }
    }

    worksheet.write_with_format(row, col as u16, value, &format)?;
    Ok(())
}

fn export_error(path: &str, error: XlsxError) -> LedgerError {
    LedgerError::Export {
        path: path.to_string(),
        message: error.to_string(),
    }
}
