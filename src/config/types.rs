//! Configuration types for the ledgers.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Pay rules for the tiered salary computation.
///
/// A day with at least one full shift earns `first_full_shift_wage`; every
/// further full shift that day is paid as `additional_shift_hours` extra
/// hours. Extra hours are paid at `extra_hour_rate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayRules {
    /// Currency label used in display strings (e.g., "Rs").
    pub currency: String,
    /// Flat wage for the first full shift of a day.
    pub first_full_shift_wage: Decimal,
    /// Hourly rate for extra hours and additional full shifts.
    pub extra_hour_rate: Decimal,
    /// Hours an additional full shift on the same day is paid as.
    pub additional_shift_hours: Decimal,
}

impl Default for PayRules {
    fn default() -> Self {
        Self {
            currency: "Rs".to_string(),
            first_full_shift_wage: Decimal::new(2300, 0),
            extra_hour_rate: Decimal::new(225, 0),
            additional_shift_hours: Decimal::new(8, 0),
        }
    }
}

/// Keys under which each collection lives in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageKeys {
    /// Key of the shift record collection.
    pub shift_history: String,
    /// Key of the expense entry collection.
    pub expenses: String,
    /// Key of the unsaved expense form draft.
    pub expense_draft: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            shift_history: "shiftHistory".to_string(),
            expenses: "expenses".to_string(),
            expense_draft: "expense-form-draft".to_string(),
        }
    }
}

/// The complete ledger configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerConfig {
    /// Salary rules.
    pay_rules: PayRules,
    /// Storage keys.
    storage: StorageKeys,
}

impl LedgerConfig {
    /// Creates a new LedgerConfig from its component parts.
    pub fn new(pay_rules: PayRules, storage: StorageKeys) -> Self {
        Self { pay_rules, storage }
    }

    /// Returns the pay rules.
    pub fn pay_rules(&self) -> &PayRules {
        &self.pay_rules
    }

    /// Returns the storage keys.
    pub fn storage(&self) -> &StorageKeys {
        &self.storage
    }
}
