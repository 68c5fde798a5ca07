//! Single-value slot for an unsaved form draft.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};

use super::KeyValueStore;

/// Holds at most one draft value under a fixed key.
#[derive(Debug)]
pub struct DraftSlot<D, S> {
    store: S,
    key: String,
    _draft: PhantomData<fn() -> D>,
}

impl<D, S> DraftSlot<D, S>
where
    D: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    /// Creates a slot for `key` in `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _draft: PhantomData,
        }
    }

    /// Returns the saved draft. A missing or unreadable draft is `None`.
    pub fn load(&self) -> Option<D> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Draft unavailable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable draft");
                None
            }
        }
    }

    /// Overwrites the saved draft.
    pub fn save(&self, draft: &D) -> LedgerResult<()> {
        let encoded = serde_json::to_string(draft).map_err(|e| LedgerError::Storage {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        self.store.set(&self.key, &encoded)
    }

    /// Forgets the saved draft.
    pub fn clear(&self) -> LedgerResult<()> {
        self.store.remove(&self.key)
    }
}
