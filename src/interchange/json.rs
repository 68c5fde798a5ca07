//! JSON backup of expense entries.
//!
//! Imports are all-or-nothing: the text must be an array whose every element
//! carries a non-empty `date`, `description`, `amount` and `type`.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::ExpenseEntry;

const REQUIRED_FIELDS: [&str; 4] = ["date", "description", "amount", "type"];

/// Renders entries as a pretty-printed JSON array.
pub fn expenses_to_json(entries: &[ExpenseEntry]) -> LedgerResult<String> {
    serde_json::to_string_pretty(entries).map_err(|e| LedgerError::Export {
        path: "<memory>".to_string(),
        message: e.to_string(),
    })
}

/// Writes a JSON backup to `path`.
pub fn write_expenses_json(entries: &[ExpenseEntry], path: &Path) -> LedgerResult<()> {
    let text = expenses_to_json(entries)?;
    fs::write(path, text).map_err(|e| LedgerError::Export {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    info!(path = %path.display(), count = entries.len(), "Exported expenses to JSON");
    Ok(())
}

/// Parses a JSON backup.
///
/// Entries without an id get a fresh one.
///
/// # Examples
///
/// ```
/// use shift_ledger::interchange::expenses_from_json;
///
/// let ok = r#"[{"date":"2024-03-01","description":"Rent","amount":"500","type":"expense"}]"#;
/// assert_eq!(expenses_from_json(ok).unwrap().len(), 1);
///
/// let missing_type = r#"[{"date":"2024-03-01","description":"Rent","amount":"500"}]"#;
/// assert!(expenses_from_json(missing_type).is_err());
/// ```
pub fn expenses_from_json(text: &str) -> LedgerResult<Vec<ExpenseEntry>> {
    let value: Value = serde_json::from_str(text).map_err(|e| invalid(format!("not JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(invalid("expected an array of entries".to_string()));
    };

    for (index, item) in items.iter().enumerate() {
        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !is_truthy(item.get(**f))) {
            return Err(invalid(format!("entry {} has no '{}'", index, field)));
        }
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| invalid(format!("entry {}: {}", index, e)))
        })
        .collect()
}

/// Reads a JSON backup from `path`.
pub fn read_expenses_json(path: &Path) -> LedgerResult<Vec<ExpenseEntry>> {
    let text = fs::read_to_string(path)
        .map_err(|e| invalid(format!("cannot read '{}': {}", path.display(), e)))?;
    expenses_from_json(&text)
}

// Empty strings, zero, false and null count as missing.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn invalid(message: String) -> LedgerError {
    LedgerError::InvalidImport { message }
}
