//! Ordered single-writer queue for remote progress writes.
//!
//! Saves and clears are queued and sent one at a time by a background task,
//! in the order they were issued. A reset bumps the generation; saves queued
//! under an older generation are dropped as superseded instead of being sent
//! after the clear.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info_span, warn, Instrument};
use vg_core::ports::{ClockPort, ProgressClientError, ProgressRemotePort};
use vg_core::{Identity, ProgressRecord};

use super::auth_guard::AuthGuard;
use super::pending::{OperationKind, OperationStatus, PendingOperations};

struct QueuedWrite {
    id: u64,
    generation: u64,
    kind: OperationKind,
}

pub(crate) struct RemoteWriter {
    tx: mpsc::UnboundedSender<QueuedWrite>,
    generation: Arc<AtomicU64>,
    pending: Arc<PendingOperations>,
    clock: Arc<dyn ClockPort>,
}

impl RemoteWriter {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    pub(crate) fn spawn(
        remote: Arc<dyn ProgressRemotePort>,
        identity: Option<Identity>,
        pending: Arc<PendingOperations>,
        auth: Arc<AuthGuard>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            remote,
            identity,
            generation: generation.clone(),
            pending: pending.clone(),
            auth,
        };
        tokio::spawn(worker.run(rx).instrument(info_span!("progress.remote_writer")));

        Self {
            tx,
            generation,
            pending,
            clock,
        }
    }

    pub(crate) fn save(&self, record: ProgressRecord) {
        let generation = self.generation.load(Ordering::SeqCst);
        self.enqueue(OperationKind::Save(record), generation);
    }

    /// Start a new generation and queue the clear under it.
    pub(crate) fn clear(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.enqueue(OperationKind::Clear, generation);
    }

    fn enqueue(&self, kind: OperationKind, generation: u64) {
        let id = self.pending.begin(kind, generation, self.clock.now_ms());
        let write = QueuedWrite {
            id,
            generation,
            kind,
        };

        if self.tx.send(write).is_err() {
            error!(operation_id = id, "Remote writer is gone, dropping progress write");
            self.pending.finish(id, OperationStatus::Dropped);
        }
    }
}

struct Worker {
    remote: Arc<dyn ProgressRemotePort>,
    identity: Option<Identity>,
    generation: Arc<AtomicU64>,
    pending: Arc<PendingOperations>,
    auth: Arc<AuthGuard>,
}

impl Worker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<QueuedWrite>) {
        while let Some(write) = rx.recv().await {
            let current = self.generation.load(Ordering::SeqCst);
            if matches!(write.kind, OperationKind::Save(_)) && write.generation < current {
                debug!(
                    operation_id = write.id,
                    generation = write.generation,
                    current,
                    "Skipping save queued before reset"
                );
                self.pending.finish(write.id, OperationStatus::Superseded);
                continue;
            }

            let status = match self.send(write.kind).await {
                Ok(()) => {
                    debug!(operation_id = write.id, kind = ?write.kind, "Progress write acknowledged");
                    OperationStatus::Succeeded
                }
                Err(err) => {
                    warn!(
                        operation_id = write.id,
                        kind = ?write.kind,
                        error = %err,
                        "Progress write failed, continuing"
                    );
                    self.auth.observe(&err);
                    OperationStatus::Failed(err.kind())
                }
            };
            self.pending.finish(write.id, status);
        }

        debug!("Remote writer queue closed");
    }

    async fn send(&self, kind: OperationKind) -> Result<(), ProgressClientError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(ProgressClientError::Unauthenticated)?;

        match kind {
            OperationKind::Save(record) => self.remote.save(identity, record).await,
            OperationKind::Clear => self.remote.clear(identity).await,
        }
    }
}
