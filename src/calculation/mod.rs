//! Calculation logic for the shift ledger.
//!
//! This module contains the stateless engine: past/future partitioning,
//! monthly aggregation with the tiered salary rule, extra-hour derivation
//! from clock times, record lookup by id or composite identity, spreadsheet
//! rows, month/year selection, expense totals, and display formatting.

mod expenses;
mod export_rows;
mod extra_hours;
mod formatting;
mod identity;
mod partition;
mod periods;
mod salary;

pub use expenses::{
    DailyTotal, EntrySuggestions, ExpenseSummary, daily_totals, entries_by_date,
    entry_suggestions, expense_summary,
};
pub use export_rows::{SHEET_HEADERS, SheetSummary, ShiftRow, ShiftSheet, export_rows, import_rows};
pub use extra_hours::{derive_extra_hours, parse_clock};
pub use formatting::{format_amount, format_grouped, month_name};
pub use identity::{IdentityMatch, resolve_id, resolve_identity};
pub use partition::{Partition, partition};
pub use periods::{Period, available_periods, select_period};
pub use salary::{DayBucket, MonthlyStats, aggregate_by_month, day_salary, total_extra_hours};
