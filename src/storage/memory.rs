//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::LedgerResult;

use super::KeyValueStore;

/// A [`KeyValueStore`] backed by a `HashMap`, for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(key.into(), value.into());
        store
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written value.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
