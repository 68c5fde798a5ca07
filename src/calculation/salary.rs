//! Monthly aggregation and the tiered salary rule.
//!
//! Salary is computed per calendar date (a day bucket):
//!
//! - no full shifts that day: 0
//! - otherwise the flat first-shift wage, plus every additional full shift
//!   paid as `additional_shift_hours` extra hours
//!
//! Extra hours of the whole month are added once, at the hourly rate, after
//! the day buckets are summed.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PayRules;
use crate::models::ShiftRecord;

/// All records sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    /// The calendar date.
    pub date: NaiveDate,
    /// Records on this date, in input order.
    pub records: Vec<ShiftRecord>,
    /// Number of full shifts in the bucket.
    pub full_shifts: usize,
    /// Tiered salary contribution of this day (extra hours excluded).
    pub salary: Decimal,
}

/// Statistics of one month of past shift records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    /// Month number (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Day buckets in ascending date order.
    pub days: Vec<DayBucket>,
    /// Count of full shifts.
    pub covered_shift_count: usize,
    /// Distinct dates with at least one full shift.
    pub working_days: usize,
    /// Sum of extra hours over every record of the month.
    pub total_extra_hours: Decimal,
    /// `total_extra_hours × extra_hour_rate`.
    pub extra_hours_salary: Decimal,
    /// Sum of day-bucket salaries plus the extra hours salary.
    pub monthly_salary: Decimal,
}

/// Tiered salary of a single day with `full_shifts` full shifts.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::day_salary;
/// use shift_ledger::config::PayRules;
/// use rust_decimal::Decimal;
///
/// let rules = PayRules::default();
/// assert_eq!(day_salary(0, &rules), Decimal::ZERO);
/// assert_eq!(day_salary(1, &rules), Decimal::new(2300, 0));
/// assert_eq!(day_salary(2, &rules), Decimal::new(4100, 0));
/// ```
pub fn day_salary(full_shifts: usize, rules: &PayRules) -> Decimal {
    if full_shifts == 0 {
        return Decimal::ZERO;
    }
    let additional = Decimal::from(full_shifts - 1);
    rules.first_full_shift_wage + additional * rules.additional_shift_hours * rules.extra_hour_rate
}

/// Sum of extra hours over the given records.
pub fn total_extra_hours<'a>(records: impl IntoIterator<Item = &'a ShiftRecord>) -> Decimal {
    records
        .into_iter()
        .filter_map(ShiftRecord::extra_hours)
        .sum()
}

/// Aggregates the records of one month.
///
/// `records` is normally the past half of a [`partition`](super::partition);
/// records outside the month are ignored.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::aggregate_by_month;
/// use shift_ledger::config::PayRules;
/// use shift_ledger::models::{ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let records = vec![
///     ShiftRecord::new(date, ShiftKind::Morning, "A"),
///     ShiftRecord::new(date, ShiftKind::Evening, "A"),
/// ];
///
/// let stats = aggregate_by_month(&records, 1, 2024, &PayRules::default());
/// assert_eq!(stats.covered_shift_count, 2);
/// assert_eq!(stats.working_days, 1);
/// assert_eq!(stats.monthly_salary, Decimal::new(4100, 0));
/// ```
pub fn aggregate_by_month(
    records: &[ShiftRecord],
    month: u32,
    year: i32,
    rules: &PayRules,
) -> MonthlyStats {
    let in_month: Vec<&ShiftRecord> = records
        .iter()
        .filter(|record| record.is_in_month(month, year))
        .collect();

    let mut grouped: BTreeMap<NaiveDate, Vec<ShiftRecord>> = BTreeMap::new();
    for record in &in_month {
        grouped.entry(record.date).or_default().push((*record).clone());
    }

    let days: Vec<DayBucket> = grouped
        .into_iter()
        .map(|(date, records)| {
            let full_shifts = records.iter().filter(|r| r.is_full_shift()).count();
            DayBucket {
                date,
                salary: day_salary(full_shifts, rules),
                records,
                full_shifts,
            }
        })
        .collect();

    let covered_shift_count = in_month.iter().filter(|r| r.is_full_shift()).count();
    let working_days = in_month
        .iter()
        .filter(|r| r.is_full_shift())
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .len();

    let total_extra_hours = total_extra_hours(in_month.iter().copied());
    let extra_hours_salary = total_extra_hours * rules.extra_hour_rate;
    let monthly_salary: Decimal =
        days.iter().map(|day| day.salary).sum::<Decimal>() + extra_hours_salary;

    MonthlyStats {
        month,
        year,
        days,
        covered_shift_count,
        working_days,
        total_extra_hours,
        extra_hours_salary,
        monthly_salary,
    }
}
