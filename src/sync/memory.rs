//! In-memory remote store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{LedgerError, LedgerResult};

use super::RemoteStore;

/// A [`RemoteStore`] keeping documents in memory.
///
/// It can be switched into a failing mode to exercise error paths.
#[derive(Debug)]
pub struct MemoryRemote<T> {
    documents: Mutex<HashMap<String, Vec<T>>>,
    failing: AtomicBool,
    pushes: AtomicUsize,
}

impl<T> Default for MemoryRemote<T> {
    fn default() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            pushes: AtomicUsize::new(0),
        }
    }
}

impl<T: Clone> MemoryRemote<T> {
    /// Creates an empty remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a remote already holding a document for `identity`.
    pub fn with_document(identity: impl Into<String>, records: Vec<T>) -> Self {
        let remote = Self::new();
        remote.lock().insert(identity.into(), records);
        remote
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the document stored for `identity`.
    pub fn document(&self, identity: &str) -> Option<Vec<T>> {
        self.lock().get(identity).cloned()
    }

    /// Number of successful pushes so far.
    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<T>>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> LedgerResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Sync {
                message: "remote store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<T> RemoteStore<T> for MemoryRemote<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn pull(&self, identity: &str) -> LedgerResult<Option<Vec<T>>> {
        self.check_available()?;
        Ok(self.document(identity))
    }

    async fn push(&self, identity: &str, records: &[T]) -> LedgerResult<()> {
        self.check_available()?;
        self.lock().insert(identity.to_string(), records.to_vec());
        self.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
