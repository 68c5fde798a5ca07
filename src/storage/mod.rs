//! Persistence for the ledgers.
//!
//! Each collection is stored as one serialized JSON array under a fixed key
//! of a [`KeyValueStore`]. [`Repository`] reads, rewrites and mutates that
//! blob as a whole; [`DraftSlot`] holds a single unsaved form draft.
//!
//! # Example
//!
//! ```
//! use shift_ledger::models::{ShiftKind, ShiftRecord};
//! use shift_ledger::storage::{MemoryStore, Repository};
//! use chrono::NaiveDate;
//!
//! let repo: Repository<ShiftRecord, _> = Repository::new(MemoryStore::new(), "shiftHistory");
//! let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//!
//! repo.mutate(|records| {
//!     records.push(ShiftRecord::new(date, ShiftKind::Morning, "A"));
//!     Ok(())
//! })?;
//! assert_eq!(repo.load().len(), 1);
//! # Ok::<(), shift_ledger::error::LedgerError>(())
//! ```

mod draft;
mod file;
mod memory;
mod repository;

use std::sync::Arc;

use crate::error::LedgerResult;

pub use draft::DraftSlot;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::Repository;

/// A string key-value store, the persistence seam of the ledgers.
pub trait KeyValueStore {
    /// Returns the value under `key`, or `None` when absent.
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> LedgerResult<()>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> LedgerResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        (**self).remove(key)
    }
}
