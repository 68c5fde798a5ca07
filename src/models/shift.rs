//! Shift record model and related types.
//!
//! This module defines [`ShiftRecord`] together with the [`ShiftKind`] label,
//! the [`ExtraTime`] variant describing hours worked beyond a normal shift,
//! the [`RecordIdentity`] composite key, and the [`ShiftEntry`] form input.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::calculation::{derive_extra_hours, parse_clock};
use crate::error::{LedgerError, LedgerResult};

const CLOCK_FORMAT: &str = "%H:%M";

/// The shift label of a record.
///
/// Only `Morning`, `Evening` and `Night` are canonical. Any other label is
/// kept verbatim in `Other` but never counts toward salary or shift counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftKind {
    /// Morning shift.
    Morning,
    /// Evening shift.
    Evening,
    /// Night shift.
    Night,
    /// Any unrecognized label.
    Other(String),
}

impl ShiftKind {
    /// Returns true for Morning, Evening and Night.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_ledger::models::ShiftKind;
    ///
    /// assert!(ShiftKind::from("Night").is_canonical());
    /// assert!(!ShiftKind::from("Split").is_canonical());
    /// ```
    pub fn is_canonical(&self) -> bool {
        !matches!(self, ShiftKind::Other(_))
    }

    /// Sort rank used by tabular export: Morning=1, Evening=2, Night=3, other=99.
    pub fn sort_order(&self) -> u8 {
        match self {
            ShiftKind::Morning => 1,
            ShiftKind::Evening => 2,
            ShiftKind::Night => 3,
            ShiftKind::Other(_) => 99,
        }
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        match self {
            ShiftKind::Morning => "Morning",
            ShiftKind::Evening => "Evening",
            ShiftKind::Night => "Night",
            ShiftKind::Other(label) => label,
        }
    }
}

impl From<&str> for ShiftKind {
    fn from(label: &str) -> Self {
        match label {
            "Morning" => ShiftKind::Morning,
            "Evening" => ShiftKind::Evening,
            "Night" => ShiftKind::Night,
            other => ShiftKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ShiftKind {
    fn from(label: String) -> Self {
        ShiftKind::from(label.as_str())
    }
}

impl From<ShiftKind> for String {
    fn from(kind: ShiftKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hours worked beyond a normal shift.
///
/// Clock times and a manually entered figure are alternatives, never both:
/// a record either derives its extra hours from a start/stop pair or carries
/// them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtraTime {
    /// No extra time recorded.
    #[default]
    Unset,
    /// Extra time measured between two clock times (may cross midnight).
    Derived {
        /// Clock time the extra work started.
        start: NaiveTime,
        /// Clock time the extra work stopped.
        stop: NaiveTime,
    },
    /// Extra hours entered directly.
    Manual {
        /// The number of hours.
        hours: Decimal,
    },
    /// An hours value that is not a number, kept verbatim.
    ///
    /// It adds nothing to extra hours but still marks the record as not
    /// a full shift.
    Unparsed {
        /// The text as entered.
        text: String,
    },
}

impl ExtraTime {
    /// Builds the variant from the three raw form fields.
    ///
    /// Blank fields are absent. When both clock times are present the
    /// result is `Derived` and the hours field is ignored; otherwise the
    /// hours field decides, see [`ExtraTime::from_hours_text`]. Only a clock
    /// time that does not parse is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_ledger::models::ExtraTime;
    /// use rust_decimal::Decimal;
    ///
    /// let extra = ExtraTime::from_fields("22:00", "06:00", "").unwrap();
    /// assert_eq!(extra.hours(), Some(Decimal::new(8, 0)));
    ///
    /// let manual = ExtraTime::from_fields("", "", "2.5").unwrap();
    /// assert_eq!(manual.hours(), Some(Decimal::new(25, 1)));
    ///
    /// let odd = ExtraTime::from_fields("", "", "abc").unwrap();
    /// assert_eq!(odd.hours(), None);
    /// assert!(!odd.is_empty_or_zero());
    /// ```
    pub fn from_fields(start: &str, stop: &str, hours: &str) -> LedgerResult<Self> {
        let start = non_blank(start).map(parse_clock).transpose()?;
        let stop = non_blank(stop).map(parse_clock).transpose()?;

        if let (Some(start), Some(stop)) = (start, stop) {
            return Ok(ExtraTime::Derived { start, stop });
        }

        Ok(Self::from_hours_text(hours))
    }

    /// Reads a bare hours field: blank is `Unset`, a number is `Manual`,
    /// anything else is kept as `Unparsed`.
    pub fn from_hours_text(hours: &str) -> Self {
        match non_blank(hours) {
            None => ExtraTime::Unset,
            Some(text) => match text.parse::<Decimal>() {
                Ok(hours) => ExtraTime::Manual { hours },
                Err(_) => ExtraTime::Unparsed {
                    text: text.to_string(),
                },
            },
        }
    }

    /// Returns the extra hours, or `None` when nothing countable is recorded.
    ///
    /// A derived span that is not strictly positive counts as no extra hours.
    pub fn hours(&self) -> Option<Decimal> {
        match self {
            ExtraTime::Unset | ExtraTime::Unparsed { .. } => None,
            ExtraTime::Derived { start, stop } => derive_extra_hours(Some(*start), Some(*stop)),
            ExtraTime::Manual { hours } => Some(*hours),
        }
    }

    /// Returns true when no extra hours are recorded or they equal zero.
    ///
    /// An unparsed value is neither.
    pub fn is_empty_or_zero(&self) -> bool {
        match self {
            ExtraTime::Unparsed { .. } => false,
            _ => self.hours().is_none_or(|hours| hours.is_zero()),
        }
    }

    /// Start clock time as "HH:MM", or empty.
    pub fn start_text(&self) -> String {
        match self {
            ExtraTime::Derived { start, .. } => start.format(CLOCK_FORMAT).to_string(),
            _ => String::new(),
        }
    }

    /// Stop clock time as "HH:MM", or empty.
    pub fn stop_text(&self) -> String {
        match self {
            ExtraTime::Derived { stop, .. } => stop.format(CLOCK_FORMAT).to_string(),
            _ => String::new(),
        }
    }

    /// Extra hours as text: two decimals when derived, as entered otherwise.
    pub fn hours_text(&self) -> String {
        match self {
            ExtraTime::Unset => String::new(),
            ExtraTime::Derived { .. } => self
                .hours()
                .map(|hours| format!("{:.2}", hours))
                .unwrap_or_default(),
            ExtraTime::Manual { hours } => hours.to_string(),
            ExtraTime::Unparsed { text } => text.clone(),
        }
    }
}

/// One recorded shift.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{ExtraTime, ShiftKind, ShiftRecord};
/// use chrono::NaiveDate;
///
/// let record = ShiftRecord::new(
///     NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
///     ShiftKind::Morning,
///     "A",
/// );
/// assert!(record.is_full_shift());
/// assert_eq!(record.extra, ExtraTime::Unset);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredShiftRecord", into = "StoredShiftRecord")]
pub struct ShiftRecord {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Calendar date of the shift.
    pub date: NaiveDate,
    /// Shift label.
    pub shift: ShiftKind,
    /// Workstation identifier.
    pub workstation: String,
    /// Extra time beyond the normal shift.
    pub extra: ExtraTime,
    /// Who this shift substitutes for.
    pub covered_for: Option<String>,
    /// Precomputed salary carried through edits and imports.
    pub salary: Option<Decimal>,
}

impl ShiftRecord {
    /// Creates a record with a fresh id and no extra time.
    pub fn new(date: NaiveDate, shift: ShiftKind, workstation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            shift,
            workstation: workstation.into(),
            extra: ExtraTime::Unset,
            covered_for: None,
            salary: None,
        }
    }

    /// Sets the extra time.
    pub fn with_extra(mut self, extra: ExtraTime) -> Self {
        self.extra = extra;
        self
    }

    /// Sets who this shift covers for.
    pub fn covering(mut self, name: impl Into<String>) -> Self {
        self.covered_for = Some(name.into());
        self
    }

    /// Returns the extra hours, if any.
    pub fn extra_hours(&self) -> Option<Decimal> {
        self.extra.hours()
    }

    /// A full shift is canonical and carries no (or zero) extra hours.
    pub fn is_full_shift(&self) -> bool {
        self.shift.is_canonical() && self.extra.is_empty_or_zero()
    }

    /// Returns true when the record falls in the given month (1-12) and year.
    pub fn is_in_month(&self, month: u32, year: i32) -> bool {
        self.date.month() == month && self.date.year() == year
    }

    /// Returns the seven-field composite identity of this record.
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity {
            date: self.date.to_string(),
            shift: self.shift.to_string(),
            workstation: self.workstation.clone(),
            extra_start_time: self.extra.start_text(),
            extra_stop_time: self.extra.stop_text(),
            extra_hours: self.extra.hours_text(),
            covered_for: self.covered_for.clone().unwrap_or_default(),
        }
    }
}

/// Composite identity of a shift record.
///
/// Absent values compare as empty strings. Two records with equal values in
/// all seven fields share an identity, which is why ids are preferred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIdentity {
    /// Date as "YYYY-MM-DD".
    pub date: String,
    /// Shift label.
    pub shift: String,
    /// Workstation identifier.
    pub workstation: String,
    /// Extra start time or empty.
    pub extra_start_time: String,
    /// Extra stop time or empty.
    pub extra_stop_time: String,
    /// Extra hours text or empty.
    pub extra_hours: String,
    /// Covered-for note or empty.
    pub covered_for: String,
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.shift, self.workstation)?;
        if !self.extra_hours.is_empty() {
            write!(f, " +{}h", self.extra_hours)?;
        }
        if !self.covered_for.is_empty() {
            write!(f, " for {}", self.covered_for)?;
        }
        Ok(())
    }
}

/// Form input for adding or editing a shift.
///
/// A submission without a date, shift or workstation is ignored rather than
/// rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftEntry {
    /// Date of the shift.
    pub date: Option<NaiveDate>,
    /// Shift label as selected.
    pub shift: String,
    /// Workstation as selected.
    pub workstation: String,
    /// Extra time.
    pub extra: ExtraTime,
    /// Covered-for note; blank means none.
    pub covered_for: Option<String>,
}

impl ShiftEntry {
    /// Creates an entry with the three required fields.
    pub fn new(date: NaiveDate, shift: impl Into<String>, workstation: impl Into<String>) -> Self {
        Self {
            date: Some(date),
            shift: shift.into(),
            workstation: workstation.into(),
            ..Self::default()
        }
    }

    /// Sets the extra time.
    pub fn with_extra(mut self, extra: ExtraTime) -> Self {
        self.extra = extra;
        self
    }

    /// Sets the covered-for note.
    pub fn covering(mut self, name: impl Into<String>) -> Self {
        self.covered_for = Some(name.into());
        self
    }

    /// Returns true when date, shift and workstation are all present.
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && !self.shift.trim().is_empty() && !self.workstation.trim().is_empty()
    }

    /// Converts the entry into a record, or `None` when incomplete.
    pub(crate) fn into_record(self, id: Uuid, salary: Option<Decimal>) -> Option<ShiftRecord> {
        if !self.is_complete() {
            return None;
        }
        let date = self.date?;
        Some(ShiftRecord {
            id,
            date,
            shift: ShiftKind::from(self.shift.trim()),
            workstation: self.workstation.trim().to_string(),
            extra: self.extra,
            covered_for: self.covered_for.and_then(|c| non_blank(&c).map(str::to_string)),
            salary,
        })
    }
}

/// Flat on-disk form of a shift record.
///
/// Mirrors the browser storage layout so blobs written before ids existed
/// still load. Numbers may arrive as strings or JSON numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredShiftRecord {
    #[serde(default)]
    id: Option<Uuid>,
    date: NaiveDate,
    shift: String,
    workstation: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    extra_start_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    extra_stop_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra_hours: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    covered_for: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salary: Option<serde_json::Value>,
}

impl TryFrom<StoredShiftRecord> for ShiftRecord {
    type Error = LedgerError;

    fn try_from(stored: StoredShiftRecord) -> Result<Self, Self::Error> {
        let hours_text = stored.extra_hours.as_ref().map(value_text).unwrap_or_default();
        let extra = ExtraTime::from_fields(
            &stored.extra_start_time,
            &stored.extra_stop_time,
            &hours_text,
        )?;

        let salary = match stored.salary.as_ref().map(value_text) {
            Some(text) if !text.trim().is_empty() => match text.trim().parse::<Decimal>() {
                Ok(salary) => Some(salary),
                Err(e) => {
                    warn!(
                        date = %stored.date,
                        salary = %text,
                        error = %e,
                        "Dropping unreadable stored salary"
                    );
                    None
                }
            },
            _ => None,
        };

        Ok(ShiftRecord {
            id: stored.id.unwrap_or_else(Uuid::new_v4),
            date: stored.date,
            shift: ShiftKind::from(stored.shift),
            workstation: stored.workstation,
            extra,
            covered_for: non_blank(&stored.covered_for).map(str::to_string),
            salary,
        })
    }
}

impl From<ShiftRecord> for StoredShiftRecord {
    fn from(record: ShiftRecord) -> Self {
        let hours = record.extra.hours_text();
        StoredShiftRecord {
            id: Some(record.id),
            date: record.date,
            shift: record.shift.into(),
            workstation: record.workstation,
            extra_start_time: record.extra.start_text(),
            extra_stop_time: record.extra.stop_text(),
            extra_hours: (!hours.is_empty()).then_some(serde_json::Value::String(hours)),
            covered_for: record.covered_for.unwrap_or_default(),
            salary: record
                .salary
                .map(|salary| serde_json::Value::String(salary.to_string())),
        }
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
