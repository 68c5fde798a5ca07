//! Totals and suggestions for the expense tracker.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::ExpenseEntry;

use super::formatting::format_amount;

/// Income and expense totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    /// Sum of income entries.
    pub total_income: Decimal,
    /// Sum of expense entries.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_balance: Decimal,
}

/// Income and expense of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    /// The date.
    pub date: NaiveDate,
    /// Income that day.
    pub income: Decimal,
    /// Expense that day.
    pub expense: Decimal,
}

/// Autocomplete values drawn from past entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntrySuggestions {
    /// Distinct descriptions, first-seen order.
    pub descriptions: Vec<String>,
    /// Distinct amounts with two decimals, largest first.
    pub amounts: Vec<String>,
}

/// Sums income and expense over all entries.
///
/// # Examples
///
/// ```
/// use shift_ledger::calculation::expense_summary;
/// use shift_ledger::models::{EntryType, ExpenseEntry};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let entries = vec![
///     ExpenseEntry::new(date, "Pay", Decimal::new(1000, 0), EntryType::Income),
///     ExpenseEntry::new(date, "Rent", Decimal::new(400, 0), EntryType::Expense),
/// ];
/// assert_eq!(expense_summary(&entries).net_balance, Decimal::new(600, 0));
/// ```
pub fn expense_summary(entries: &[ExpenseEntry]) -> ExpenseSummary {
    let (total_income, total_expense) =
        entries
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), entry| {
                if entry.is_income() {
                    (income + entry.amount, expense)
                } else {
                    (income, expense + entry.amount)
                }
            });

    ExpenseSummary {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
    }
}

/// Per-date totals, newest date first.
pub fn daily_totals(entries: &[ExpenseEntry]) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for entry in entries {
        let (income, expense) = totals.entry(entry.date).or_default();
        if entry.is_income() {
            *income += entry.amount;
        } else {
            *expense += entry.amount;
        }
    }

    totals
        .into_iter()
        .rev()
        .map(|(date, (income, expense))| DailyTotal {
            date,
            income,
            expense,
        })
        .collect()
}

/// Entries grouped by date, newest date first, input order within a date.
pub fn entries_by_date(entries: &[ExpenseEntry]) -> Vec<(NaiveDate, Vec<&ExpenseEntry>)> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&ExpenseEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.date).or_default().push(entry);
    }
    grouped.into_iter().rev().collect()
}

/// Distinct descriptions and amounts for form autocompletion.
pub fn entry_suggestions(entries: &[ExpenseEntry]) -> EntrySuggestions {
    let mut seen = HashSet::new();
    let descriptions = entries
        .iter()
        .map(|entry| entry.description.clone())
        .filter(|description| !description.is_empty() && seen.insert(description.clone()))
        .collect();

    let mut amounts: Vec<Decimal> = entries.iter().map(|entry| entry.amount.round_dp(2)).collect();
    amounts.sort_unstable_by(|a, b| b.cmp(a));
    amounts.dedup();

    EntrySuggestions {
        descriptions,
        amounts: amounts.into_iter().map(format_amount).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(date: &str, description: &str, amount: &str, entry_type: EntryType) -> ExpenseEntry {
        ExpenseEntry::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description,
            dec(amount),
            entry_type,
        )
    }

    #[test]
    fn test_summary_of_empty_ledger() {
        assert_eq!(expense_summary(&[]), ExpenseSummary::default());
    }

    #[test]
    fn test_summary_can_go_negative() {
        let entries = vec![
            entry("2024-05-01", "Pay", "100", EntryType::Income),
            entry("2024-05-02", "Rent", "250.50", EntryType::Expense),
        ];
        let summary = expense_summary(&entries);
        assert_eq!(summary.total_income, dec("100"));
        assert_eq!(summary.total_expense, dec("250.50"));
        assert_eq!(summary.net_balance, dec("-150.50"));
    }

    #[test]
    fn test_daily_totals_newest_first() {
        let entries = vec![
            entry("2024-05-01", "Pay", "100", EntryType::Income),
            entry("2024-05-03", "Tea", "2", EntryType::Expense),
            entry("2024-05-01", "Lunch", "12", EntryType::Expense),
            entry("2024-05-03", "Tea", "2", EntryType::Expense),
        ];
        let totals = daily_totals(&entries);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date.to_string(), "2024-05-03");
        assert_eq!(totals[0].expense, dec("4"));
        assert_eq!(totals[0].income, dec("0"));
        assert_eq!(totals[1].income, dec("100"));
        assert_eq!(totals[1].expense, dec("12"));
    }

    #[test]
    fn test_entries_by_date_keeps_input_order() {
        let entries = vec![
            entry("2024-05-01", "First", "1", EntryType::Expense),
            entry("2024-05-02", "Other", "1", EntryType::Expense),
            entry("2024-05-01", "Second", "1", EntryType::Expense),
        ];
        let grouped = entries_by_date(&entries);
        assert_eq!(grouped[0].1[0].description, "Other");
        let names: Vec<_> = grouped[1].1.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_suggestions_are_unique() {
        let entries = vec![
            entry("2024-05-01", "Tea", "2", EntryType::Expense),
            entry("2024-05-02", "Bus", "15.5", EntryType::Expense),
            entry("2024-05-03", "Tea", "2.00", EntryType::Expense),
        ];
        let suggestions = entry_suggestions(&entries);
        assert_eq!(suggestions.descriptions, vec!["Tea", "Bus"]);
        assert_eq!(suggestions.amounts, vec!["15.50", "2.00"]);
    }
}
