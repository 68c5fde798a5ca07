//! Extra-hour derivation from clock times.
//!
//! Extra work is recorded as a start and stop clock time on the same
//! record. A stop time earlier than the start time means the work ran past
//! midnight.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses a "HH:MM" clock time.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::parse_clock;
///
/// assert!(parse_clock("22:00").is_ok());
/// assert!(parse_clock("7pm").is_err());
/// ```
pub fn parse_clock(text: &str) -> LedgerResult<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|e| LedgerError::InvalidRecord {
        field: "clockTime".to_string(),
        message: format!("'{}' is not a HH:MM time: {}", text.trim(), e),
    })
}

/// Computes the hours between two clock times, wrapping past midnight.
///
/// The span is `(stop - start) mod 24h`, rounded to two decimals. Returns
/// `None` when either time is missing or the span is not strictly positive.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::{derive_extra_hours, parse_clock};
/// use rust_decimal::Decimal;
///
/// let start = parse_clock("22:00").ok();
/// let stop = parse_clock("06:00").ok();
/// assert_eq!(derive_extra_hours(start, stop), Some(Decimal::new(8, 0)));
///
/// let same = parse_clock("09:00").ok();
/// assert_eq!(derive_extra_hours(same, same), None);
/// ```
pub fn derive_extra_hours(start: Option<NaiveTime>, stop: Option<NaiveTime>) -> Option<Decimal> {
    let (start, stop) = (start?, stop?);

    let start_minutes = minutes_since_midnight(start);
    let mut stop_minutes = minutes_since_midnight(stop);
    if stop_minutes < start_minutes {
        stop_minutes += MINUTES_PER_DAY;
    }

    let hours = (Decimal::new(stop_minutes - start_minutes, 0) / Decimal::new(60, 0)).round_dp(2);
    (hours > Decimal::ZERO).then(|| hours.normalize())
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
