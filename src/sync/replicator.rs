//! Background push of saved snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};

use super::{RemoteStore, SyncStatus};

/// Statuses buffered for a receiver that is not draining.
pub const STATUS_CAPACITY: usize = 64;

/// Pushes snapshots of one collection to a [`RemoteStore`].
///
/// Every outcome is sent on the status channel returned by
/// [`Replicator::new`]. The channel holds at most [`STATUS_CAPACITY`]
/// statuses; while it is full, newer statuses are dropped. Pushes requested
/// while a pull is in flight are dropped and reported as
/// [`SyncStatus::Skipped`].
pub struct Replicator<T> {
    remote: Arc<dyn RemoteStore<T>>,
    identity: String,
    status: mpsc::Sender<SyncStatus>,
    pulling: Arc<AtomicBool>,
}

impl<T> Clone for Replicator<T> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            identity: self.identity.clone(),
            status: self.status.clone(),
            pulling: Arc::clone(&self.pulling),
        }
    }
}

impl<T> std::fmt::Debug for Replicator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replicator")
            .field("identity", &self.identity)
            .field("pulling", &self.pulling.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T> Replicator<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a replicator for `identity` and the receiving end of its
    /// status channel.
    pub fn new(
        remote: Arc<dyn RemoteStore<T>>,
        identity: impl Into<String>,
    ) -> (Self, mpsc::Receiver<SyncStatus>) {
        let (status, receiver) = mpsc::channel(STATUS_CAPACITY);
        let replicator = Self {
            remote,
            identity: identity.into(),
            status,
            pulling: Arc::new(AtomicBool::new(false)),
        };
        (replicator, receiver)
    }

    /// The remote identity this replicator writes under.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns true while a pull is in flight.
    pub fn is_pulling(&self) -> bool {
        self.pulling.load(Ordering::SeqCst)
    }

    /// Pushes `snapshot` in a background task.
    ///
    /// Returns the task handle, or `None` when nothing was spawned (a pull
    /// is in flight or no tokio runtime is running).
    pub fn replicate(&self, snapshot: Vec<T>) -> Option<JoinHandle<()>> {
        if self.is_pulling() {
            debug!(identity = %self.identity, "Pull in flight, skipping push");
            self.report(SyncStatus::Skipped);
            return None;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    identity = %self.identity,
                    error = %e,
                    "No async runtime, push not attempted"
                );
                self.report(SyncStatus::Failed {
                    message: e.to_string(),
                });
                return None;
            }
        };

        let remote = Arc::clone(&self.remote);
        let identity = self.identity.clone();
        let status = self.status.clone();
        Some(handle.spawn(async move {
            let count = snapshot.len();
            let outcome = match remote.push(&identity, &snapshot).await {
                Ok(()) => {
                    info!(identity = %identity, count, "Pushed snapshot to remote");
                    SyncStatus::Pushed { count }
                }
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Remote push failed");
                    SyncStatus::Failed {
                        message: e.to_string(),
                    }
                }
            };
            send_status(&status, outcome);
        }))
    }

    /// Fetches the remote collection.
    ///
    /// Pushes are suppressed until the pull completes. `Ok(None)` means the
    /// remote holds nothing for this identity.
    pub async fn pull(&self) -> LedgerResult<Option<Vec<T>>> {
        let _guard = PullGuard::engage(&self.pulling);
        match self.remote.pull(&self.identity).await {
            Ok(Some(records)) => {
                info!(
                    identity = %self.identity,
                    count = records.len(),
                    "Pulled collection from remote"
                );
                self.report(SyncStatus::Pulled {
                    count: records.len(),
                });
                Ok(Some(records))
            }
            Ok(None) => {
                info!(identity = %self.identity, "Remote holds no data");
                self.report(SyncStatus::NoRemoteData);
                Ok(None)
            }
            Err(e) => {
                warn!(identity = %self.identity, error = %e, "Remote pull failed");
                self.report(SyncStatus::Failed {
                    message: e.to_string(),
                });
                Err(LedgerError::Sync {
                    message: e.to_string(),
                })
            }
        }
    }

    fn report(&self, status: SyncStatus) {
        send_status(&self.status, status);
    }
}

fn send_status(sender: &mpsc::Sender<SyncStatus>, status: SyncStatus) {
    // Nobody listening is fine; a full channel drops the newest status.
    if let Err(mpsc::error::TrySendError::Full(dropped)) = sender.try_send(status) {
        debug!(status = ?dropped, "Status channel full, dropping status");
    }
}

struct PullGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PullGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for PullGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
