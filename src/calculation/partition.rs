//! Past/future partitioning of shift records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::ShiftRecord;

/// Shift records split around a reference date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Records dated on or before the reference date, most recent first.
    pub past: Vec<ShiftRecord>,
    /// Records dated after the reference date, soonest first.
    pub future: Vec<ShiftRecord>,
}

/// Splits records into past (date ≤ today) and future (date > today).
///
/// Both halves are stably sorted, so records sharing a date keep their
/// input order. The input is not modified.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::partition;
/// use shift_ledger::models::{ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let records = vec![
///     ShiftRecord::new(day(3), ShiftKind::Morning, "A"),
///     ShiftRecord::new(day(20), ShiftKind::Night, "A"),
///     ShiftRecord::new(day(9), ShiftKind::Evening, "B"),
/// ];
///
/// let split = partition(&records, day(10));
/// assert_eq!(split.past.iter().map(|r| r.date).collect::<Vec<_>>(), vec![day(9), day(3)]);
/// assert_eq!(split.future.len(), 1);
/// ```
pub fn partition(records: &[ShiftRecord], today: NaiveDate) -> Partition {
    let (mut past, mut future): (Vec<ShiftRecord>, Vec<ShiftRecord>) =
        records.iter().cloned().partition(|record| record.date <= today);

    past.sort_by(|a, b| b.date.cmp(&a.date));
    future.sort_by(|a, b| a.date.cmp(&b.date));

    Partition { past, future }
}
