//! Whole-collection repository over a key-value store.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};

use super::KeyValueStore;

/// One collection serialized as a JSON array under a single key.
///
/// Every write replaces the whole array. Records are kept in the order the
/// ledger chose; the repository never reorders them.
#[derive(Debug)]
pub struct Repository<T, S> {
    store: S,
    key: String,
    _records: PhantomData<fn() -> T>,
}

impl<T, S> Repository<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    /// Creates a repository for `key` in `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _records: PhantomData,
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the collection, treating absent or unreadable data as empty.
    ///
    /// Unreadable data is logged and left untouched in the store.
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = %e,
                    "Stored collection unreadable, using empty list"
                );
                Vec::new()
            }
        }
    }

    /// Loads the collection, failing on unreadable data.
    ///
    /// Absent data is an empty collection. Readable data that is not in
    /// canonical form (records missing an id, legacy field order) is written
    /// back once so later loads see stable ids. A failed write-back is only
    /// logged; the decoded records are still returned.
    pub fn try_load(&self) -> LedgerResult<Vec<T>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<T> = serde_json::from_str(&raw).map_err(|e| LedgerError::Storage {
            key: self.key.clone(),
            message: e.to_string(),
        })?;

        let canonical = self.encode(&records)?;
        if canonical != raw {
            info!(key = %self.key, count = records.len(), "Normalizing stored collection");
            if let Err(e) = self.store.set(&self.key, &canonical) {
                warn!(key = %self.key, error = %e, "Could not write back normalized collection");
            }
        }
        Ok(records)
    }

    /// Replaces the stored collection.
    pub fn save(&self, records: &[T]) -> LedgerResult<()> {
        let encoded = self.encode(records)?;
        self.store.set(&self.key, &encoded)?;
        debug!(key = %self.key, count = records.len(), "Saved collection");
        Ok(())
    }

    /// Loads, applies `f`, and saves when `f` succeeds.
    ///
    /// Loading is strict: unreadable stored data aborts the mutation instead
    /// of being overwritten.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> LedgerResult<R>) -> LedgerResult<R> {
        let mut records = self.try_load()?;
        let result = f(&mut records)?;
        self.save(&records)?;
        Ok(result)
    }

    /// Removes the stored collection entirely.
    pub fn clear(&self) -> LedgerResult<()> {
        self.store.remove(&self.key)
    }

    fn encode(&self, records: &[T]) -> LedgerResult<String> {
        serde_json::to_string(records).map_err(|e| LedgerError::Storage {
            key: self.key.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseEntry, ShiftKind, ShiftRecord};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shift_repo(store: MemoryStore) -> Repository<ShiftRecord, MemoryStore> {
        Repository::new(store, "shiftHistory")
    }

    /// Serves reads from an inner store and rejects every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> LedgerResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, _value: &str) -> LedgerResult<()> {
            Err(LedgerError::Storage {
                key: key.to_string(),
                message: "read-only".to_string(),
            })
        }

        fn remove(&self, key: &str) -> LedgerResult<()> {
            self.set(key, "")
        }
    }

    #[test]
    fn test_absent_key_loads_empty() {
        let repo = shift_repo(MemoryStore::new());
        assert!(repo.load().is_empty());
        assert!(repo.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let repo = shift_repo(MemoryStore::new());
        let records = vec![
            ShiftRecord::new(make_date(2024, 1, 9), ShiftKind::Night, "C"),
            ShiftRecord::new(make_date(2024, 1, 2), ShiftKind::Morning, "A"),
        ];
        repo.save(&records).unwrap();
        assert_eq!(repo.load(), records);
    }

    #[test]
    fn test_malformed_data_loads_empty_but_is_kept() {
        let store = MemoryStore::with_value("shiftHistory", "{not json");
        let repo = shift_repo(store);

        assert!(repo.load().is_empty());
        assert_eq!(
            repo.store().get("shiftHistory").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_mutate_refuses_to_overwrite_malformed_data() {
        let repo = shift_repo(MemoryStore::with_value("shiftHistory", "{not json"));

        let result = repo.mutate(|records| {
            records.push(ShiftRecord::new(make_date(2024, 1, 1), ShiftKind::Morning, "A"));
            Ok(())
        });

        assert!(matches!(result, Err(LedgerError::Storage { .. })));
        assert_eq!(
            repo.store().get("shiftHistory").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_failed_mutation_does_not_save() {
        let repo = shift_repo(MemoryStore::new());
        repo.save(&[ShiftRecord::new(make_date(2024, 1, 1), ShiftKind::Morning, "A")])
            .unwrap();

        let result: LedgerResult<()> = repo.mutate(|records| {
            records.clear();
            Err(LedgerError::RecordNotFound {
                reference: "x".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(repo.load().len(), 1);
    }

    #[test]
    fn test_legacy_records_get_stable_ids() {
        let legacy = r#"[{"date":"2024-01-05","shift":"Morning","workstation":"A"}]"#;
        let repo = shift_repo(MemoryStore::with_value("shiftHistory", legacy));

        let first = repo.load();
        let second = repo.load();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, second[0].id);
        assert_ne!(
            repo.store().get("shiftHistory").unwrap().as_deref(),
            Some(legacy)
        );
    }

    #[test]
    fn test_failed_write_back_still_returns_records() {
        let legacy = r#"[{"date":"2024-01-05","shift":"Morning","workstation":"A"}]"#;
        let repo: Repository<ShiftRecord, _> = Repository::new(
            ReadOnlyStore(MemoryStore::with_value("shiftHistory", legacy)),
            "shiftHistory",
        );

        let records = repo.try_load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(repo.load().len(), 1);
        assert_eq!(
            repo.store().get("shiftHistory").unwrap().as_deref(),
            Some(legacy)
        );
    }

    #[test]
    fn test_record_with_unparsed_extra_hours_keeps_blob_readable() {
        let blob = r#"[
            {"date":"2024-01-05","shift":"Morning","workstation":"A"},
            {"date":"2024-01-05","shift":"Night","workstation":"A","extraHours":"abc"}
        ]"#;
        let repo = shift_repo(MemoryStore::with_value("shiftHistory", blob));

        let records = repo.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].extra.hours_text(), "abc");

        repo.mutate(|records| {
            records.push(ShiftRecord::new(make_date(2024, 1, 6), ShiftKind::Evening, "B"));
            Ok(())
        })
        .unwrap();
        assert_eq!(repo.load().len(), 3);
    }

    #[test]
    fn test_legacy_expenses_get_stable_ids() {
        let legacy = r#"[{"date":"2024-03-01","description":"Rent","amount":"500","type":"expense"}]"#;
        let repo: Repository<ExpenseEntry, _> =
            Repository::new(MemoryStore::with_value("expenses", legacy), "expenses");

        let first = repo.load();
        let second = repo.load();
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_canonical_data_is_not_rewritten() {
        let repo = shift_repo(MemoryStore::new());
        repo.save(&[ShiftRecord::new(make_date(2024, 1, 1), ShiftKind::Evening, "B")])
            .unwrap();
        let before = repo.store().get("shiftHistory").unwrap();

        repo.load();
        assert_eq!(repo.store().get("shiftHistory").unwrap(), before);
    }

    #[test]
    fn test_clear() {
        let repo = shift_repo(MemoryStore::new());
        repo.save(&[ShiftRecord::new(make_date(2024, 1, 1), ShiftKind::Evening, "B")])
            .unwrap();
        repo.clear().unwrap();
        assert!(repo.load().is_empty());
    }
}
