//! Registry of fire-and-forget remote writes.
//!
//! Every save/clear handed to the remote writer is recorded here with its
//! outcome, so hosts and tests can observe what happened to writes nobody
//! waits for.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use vg_core::ports::FailureKind;
use vg_core::ProgressRecord;

/// Resolved operations kept for inspection; in-flight ones are never evicted.
const MAX_RESOLVED: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Save(ProgressRecord),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    InFlight,
    Succeeded,
    Failed(FailureKind),
    /// A save queued before a reset; never sent.
    Superseded,
    /// The writer was gone before the operation could be queued.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub id: u64,
    pub kind: OperationKind,
    pub generation: u64,
    pub started_at_ms: i64,
    pub status: OperationStatus,
}

pub(crate) struct PendingOperations {
    entries: Mutex<VecDeque<PendingOperation>>,
    next_id: AtomicU64,
    in_flight: watch::Sender<usize>,
    sync_error: AtomicBool,
}

impl PendingOperations {
    pub(crate) fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            entries: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
            in_flight,
            sync_error: AtomicBool::new(false),
        }
    }

    pub(crate) fn begin(&self, kind: OperationKind, generation: u64, now_ms: i64) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lock().push_back(PendingOperation {
            id,
            kind,
            generation,
            started_at_ms: now_ms,
            status: OperationStatus::InFlight,
        });
        self.in_flight.send_modify(|count| *count += 1);
        id
    }

    pub(crate) fn finish(&self, id: u64, status: OperationStatus) {
        {
            let mut entries = self.lock();
            let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
                return;
            };
            if entry.status != OperationStatus::InFlight {
                return;
            }
            entry.status = status;
            Self::evict_resolved(&mut entries);
        }

        match status {
            OperationStatus::Succeeded => self.sync_error.store(false, Ordering::SeqCst),
            OperationStatus::Failed(_) | OperationStatus::Dropped => {
                self.sync_error.store(true, Ordering::SeqCst)
            }
            OperationStatus::InFlight | OperationStatus::Superseded => {}
        }
        self.in_flight
            .send_modify(|count| *count = count.saturating_sub(1));
    }

    pub(crate) fn snapshot(&self) -> Vec<PendingOperation> {
        self.lock().iter().cloned().collect()
    }

    pub(crate) fn in_flight_count(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Resolves once no operation is in flight.
    pub(crate) async fn settle(&self) {
        let mut rx = self.in_flight.subscribe();
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    pub(crate) fn has_sync_error(&self) -> bool {
        self.sync_error.load(Ordering::SeqCst)
    }

    pub(crate) fn set_sync_error(&self, failed: bool) {
        self.sync_error.store(failed, Ordering::SeqCst);
    }

    fn evict_resolved(entries: &mut VecDeque<PendingOperation>) {
        let resolved = entries
            .iter()
            .filter(|entry| entry.status != OperationStatus::InFlight)
            .count();
        let mut excess = resolved.saturating_sub(MAX_RESOLVED);
        entries.retain(|entry| {
            if excess > 0 && entry.status != OperationStatus::InFlight {
                excess -= 1;
                return false;
            }
            true
        });
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PendingOperation>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
