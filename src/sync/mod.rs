//! Best-effort replication of a collection to a remote document store.
//!
//! Local saves always come first. A [`Replicator`] then pushes the saved
//! snapshot in the background and reports the outcome as a [`SyncStatus`]
//! on a channel. A remote failure never turns a local save into an error.

mod memory;
mod replicator;

use async_trait::async_trait;

use crate::error::LedgerResult;

pub use memory::MemoryRemote;
pub use replicator::{Replicator, STATUS_CAPACITY};

/// A remote store holding one document (a full collection) per identity.
#[async_trait]
pub trait RemoteStore<T>: Send + Sync + 'static {
    /// Fetches the collection stored for `identity`, `None` when there is none.
    async fn pull(&self, identity: &str) -> LedgerResult<Option<Vec<T>>>;

    /// Replaces the collection stored for `identity`.
    async fn push(&self, identity: &str, records: &[T]) -> LedgerResult<()>;
}

/// Outcome of one replication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// A snapshot was written to the remote.
    Pushed {
        /// Records in the snapshot.
        count: usize,
    },
    /// The remote collection was fetched.
    Pulled {
        /// Records fetched.
        count: usize,
    },
    /// The remote had nothing stored; local data was left as is.
    NoRemoteData,
    /// A push was suppressed because a pull was in flight.
    Skipped,
    /// The remote call failed.
    Failed {
        /// Error description.
        message: String,
    },
}
