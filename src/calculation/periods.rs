//! Month/year selection over a record collection.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::ShiftRecord;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
}

impl Period {
    /// Creates a period.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

/// Years present in `records`, ascending, each with its months ascending.
pub fn available_periods(records: &[ShiftRecord]) -> BTreeMap<i32, Vec<u32>> {
    let mut periods: BTreeMap<i32, Vec<u32>> = BTreeMap::new();
    for record in records {
        let months = periods.entry(record.date.year()).or_default();
        if !months.contains(&record.date.month()) {
            months.push(record.date.month());
        }
    }
    for months in periods.values_mut() {
        months.sort_unstable();
    }
    periods
}

/// Picks the period to show.
///
/// The previous selection is kept when its year still has records. The
/// month is kept when that year still has it, otherwise the year's latest
/// month is used. Without a usable previous year the latest year and its
/// latest month are chosen. Returns `None` for an empty collection.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::{select_period, Period};
/// use shift_ledger::models::{ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let records = vec![
///     ShiftRecord::new(NaiveDate::from_ymd_opt(2023, 11, 2).unwrap(), ShiftKind::Night, "A"),
///     ShiftRecord::new(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(), ShiftKind::Night, "A"),
/// ];
///
/// assert_eq!(select_period(&records, None), Some(Period::new(2024, 2)));
/// assert_eq!(select_period(&records, Some(Period::new(2023, 4))), Some(Period::new(2023, 11)));
/// ```
pub fn select_period(records: &[ShiftRecord], previous: Option<Period>) -> Option<Period> {
    let periods = available_periods(records);

    let (year, months) = previous
        .and_then(|p| periods.get_key_value(&p.year))
        .or_else(|| periods.iter().next_back())?;

    let month = previous
        .filter(|p| p.year == *year && months.contains(&p.month))
        .map(|p| p.month)
        .or_else(|| months.last().copied())?;

    Some(Period::new(*year, month))
}
