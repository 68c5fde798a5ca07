//! Core data models for the shift ledger.
//!
//! This module contains the shift recorder and expense tracker records.

mod expense;
mod shift;

pub use expense::{EntryType, ExpenseDraft, ExpenseEntry, ExpenseInput};
pub use shift::{ExtraTime, RecordIdentity, ShiftEntry, ShiftKind, ShiftRecord};
