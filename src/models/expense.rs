//! Expense entry model and related types.
//!
//! This module defines [`ExpenseEntry`] and [`EntryType`] for the daily
//! expense tracker, the [`ExpenseInput`] form submission, and the
//! [`ExpenseDraft`] kept while a form is being filled in.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an entry adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl EntryType {
    /// Returns the serialized label.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

// Anything that is not exactly "income" is booked as an expense.
impl From<String> for EntryType {
    fn from(label: String) -> Self {
        if label == "income" {
            EntryType::Income
        } else {
            EntryType::Expense
        }
    }
}

impl From<EntryType> for String {
    fn from(entry_type: EntryType) -> Self {
        entry_type.as_str().to_string()
    }
}

/// A dated income or expense.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{EntryType, ExpenseEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entry = ExpenseEntry::new(
///     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
///     "Groceries",
///     Decimal::new(4550, 2),
///     EntryType::Expense,
/// );
/// assert!(!entry.is_income());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Stable identifier; assigned on load for entries written without one.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Date of the entry.
    pub date: NaiveDate,
    /// What the money was for.
    pub description: String,
    /// Amount, always positive; the type carries the sign.
    pub amount: Decimal,
    /// Income or expense.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

impl ExpenseEntry {
    /// Creates an entry with a fresh id.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        entry_type: EntryType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: description.into(),
            amount,
            entry_type,
        }
    }

    /// Returns true for income entries.
    pub fn is_income(&self) -> bool {
        self.entry_type == EntryType::Income
    }
}

/// A submitted expense form.
///
/// Submissions missing the date, description or amount are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    /// Entry date.
    pub date: Option<NaiveDate>,
    /// Description; surrounding whitespace is trimmed.
    pub description: String,
    /// Amount.
    pub amount: Option<Decimal>,
    /// Income or expense.
    pub entry_type: EntryType,
}

impl ExpenseInput {
    /// Creates a complete input.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        entry_type: EntryType,
    ) -> Self {
        Self {
            date: Some(date),
            description: description.into(),
            amount: Some(amount),
            entry_type,
        }
    }

    /// Converts into an entry, or `None` when a required field is missing.
    pub(crate) fn into_entry(self, id: Uuid) -> Option<ExpenseEntry> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }
        Some(ExpenseEntry {
            id,
            date: self.date?,
            description: description.to_string(),
            amount: self.amount?,
            entry_type: self.entry_type,
        })
    }
}

/// Unsaved expense form fields, stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// Selected type.
    #[serde(rename = "type", default)]
    pub entry_type: String,
    /// Date field.
    #[serde(default)]
    pub date: String,
    /// Description field.
    #[serde(default)]
    pub description: String,
    /// Amount field.
    #[serde(default)]
    pub amount: String,
}
