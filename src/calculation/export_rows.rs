//! Tabular rows for spreadsheet export and import.
//!
//! A [`ShiftSheet`] is the month view handed to the CSV and XLSX writers:
//! one [`ShiftRow`] per record with a fixed column order, plus a summary
//! computed with the tiered salary rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::PayRules;
use crate::models::{ExtraTime, ShiftKind, ShiftRecord};

use super::formatting::month_name;
use super::salary::aggregate_by_month;

/// Column headers in export order.
pub const SHEET_HEADERS: [&str; 8] = [
    "Date",
    "Shift",
    "Workstation",
    "Extra Start Time",
    "Extra Stop Time",
    "Extra Hours",
    "Covered For",
    "Salary",
];

/// One spreadsheet row. Absent values are empty strings.
///
/// Every column defaults to empty on import, so sheets missing optional
/// columns still read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRow {
    /// Date as "YYYY-MM-DD".
    #[serde(rename = "Date", default)]
    pub date: String,
    /// Shift label.
    #[serde(rename = "Shift", default)]
    pub shift: String,
    /// Workstation identifier.
    #[serde(rename = "Workstation", default)]
    pub workstation: String,
    /// Extra start time "HH:MM".
    #[serde(rename = "Extra Start Time", default)]
    pub extra_start_time: String,
    /// Extra stop time "HH:MM".
    #[serde(rename = "Extra Stop Time", default)]
    pub extra_stop_time: String,
    /// Extra hours.
    #[serde(rename = "Extra Hours", default)]
    pub extra_hours: String,
    /// Covered-for note.
    #[serde(rename = "Covered For", default)]
    pub covered_for: String,
    /// Precomputed salary.
    #[serde(rename = "Salary", default)]
    pub salary: String,
}

impl ShiftRow {
    /// Builds a row from cells matched to `headers` by name.
    ///
    /// Unknown headers are ignored and missing ones stay empty.
    pub fn from_cells<H, C>(headers: &[H], cells: impl IntoIterator<Item = C>) -> Self
    where
        H: AsRef<str>,
        C: Into<String>,
    {
        let mut row = ShiftRow::default();
        for (header, cell) in headers.iter().zip(cells) {
            let slot = match header.as_ref().trim() {
                "Date" => &mut row.date,
                "Shift" => &mut row.shift,
                "Workstation" => &mut row.workstation,
                "Extra Start Time" => &mut row.extra_start_time,
                "Extra Stop Time" => &mut row.extra_stop_time,
                "Extra Hours" => &mut row.extra_hours,
                "Covered For" => &mut row.covered_for,
                "Salary" => &mut row.salary,
                _ => continue,
            };
            let text: String = cell.into();
            *slot = text.trim().to_string();
        }
        row
    }

    /// Cell values in [`SHEET_HEADERS`] order.
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.date,
            &self.shift,
            &self.workstation,
            &self.extra_start_time,
            &self.extra_stop_time,
            &self.extra_hours,
            &self.covered_for,
            &self.salary,
        ]
    }
}

impl From<&ShiftRecord> for ShiftRow {
    fn from(record: &ShiftRecord) -> Self {
        ShiftRow {
            date: record.date.to_string(),
            shift: record.shift.to_string(),
            workstation: record.workstation.clone(),
            extra_start_time: record.extra.start_text(),
            extra_stop_time: record.extra.stop_text(),
            extra_hours: record.extra.hours_text(),
            covered_for: record.covered_for.clone().unwrap_or_default(),
            salary: record.salary.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

/// Summary block of an exported month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    /// Count of full shifts in the month.
    pub covered_shift_count: usize,
    /// Tiered monthly salary of the month.
    pub monthly_salary: Decimal,
}

/// Rows and summary of one exported month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftSheet {
    /// Month number (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Rows sorted by date, then shift order.
    pub rows: Vec<ShiftRow>,
    /// Summary computed over the same month.
    pub summary: SheetSummary,
}

impl ShiftSheet {
    /// Worksheet name of the rows, e.g. "Shifts January".
    pub fn sheet_name(&self) -> String {
        format!("Shifts {}", month_name(self.month))
    }

    /// Suggested file stem, e.g. "shift_records_January_2024".
    pub fn file_stem(&self) -> String {
        format!("shift_records_{}_{}", month_name(self.month), self.year)
    }
}

/// Builds the export sheet of one month.
///
/// Every record dated in the month is included, future-dated ones too.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::export_rows;
/// use shift_ledger::config::PayRules;
/// use shift_ledger::models::{ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let records = vec![
///     ShiftRecord::new(day(5), ShiftKind::Night, "A"),
///     ShiftRecord::new(day(5), ShiftKind::Morning, "A"),
/// ];
///
/// let sheet = export_rows(&records, 1, 2024, &PayRules::default());
/// assert_eq!(sheet.rows[0].shift, "Morning");
/// assert_eq!(sheet.summary.covered_shift_count, 2);
/// ```
pub fn export_rows(records: &[ShiftRecord], month: u32, year: i32, rules: &PayRules) -> ShiftSheet {
    let mut in_month: Vec<&ShiftRecord> = records
        .iter()
        .filter(|record| record.is_in_month(month, year))
        .collect();

    in_month.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.shift.sort_order().cmp(&b.shift.sort_order()))
    });

    let stats = aggregate_by_month(records, month, year, rules);

    ShiftSheet {
        month,
        year,
        rows: in_month.into_iter().map(ShiftRow::from).collect(),
        summary: SheetSummary {
            covered_shift_count: stats.covered_shift_count,
            monthly_salary: stats.monthly_salary,
        },
    }
}

/// Converts imported rows back into records.
///
/// Rows missing a date, shift or workstation, or whose date does not parse,
/// are dropped. Unreadable clock times and salary cells are treated as empty.
/// An extra-hours cell that is not a number is kept as
/// [`ExtraTime::Unparsed`].
/// Each imported record gets a fresh id.
pub fn import_rows(rows: &[ShiftRow]) -> Vec<ShiftRecord> {
    rows.iter().filter_map(import_row).collect()
}

fn import_row(row: &ShiftRow) -> Option<ShiftRecord> {
    let (date, shift, workstation) = (row.date.trim(), row.shift.trim(), row.workstation.trim());
    if date.is_empty() || shift.is_empty() || workstation.is_empty() {
        return None;
    }

    let date = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            warn!(date = %date, error = %e, "Dropping imported row with unreadable date");
            return None;
        }
    };

    let extra = ExtraTime::from_fields(
        &row.extra_start_time,
        &row.extra_stop_time,
        &row.extra_hours,
    )
    .unwrap_or_else(|e| {
        warn!(date = %date, error = %e, "Ignoring unreadable clock times in imported row");
        ExtraTime::from_hours_text(&row.extra_hours)
    });

    let salary = row.salary.trim();
    let salary = if salary.is_empty() {
        None
    } else {
        salary.parse::<Decimal>().ok()
    };

    let covered_for = row.covered_for.trim();

    Some(ShiftRecord {
        id: Uuid::new_v4(),
        date,
        shift: ShiftKind::from(shift),
        workstation: workstation.to_string(),
        extra,
        covered_for: (!covered_for.is_empty()).then(|| covered_for.to_string()),
        salary,
    })
}
