//! Progress tracker.
//!
//! This module drives the progress state machine and carries out its side
//! effects against the ports: remote writes go through the ordered writer
//! queue, the UnlockFlag goes to the local cache, and the unlock signal goes
//! to the host application.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, info_span, warn, Instrument};
use vg_core::ports::{
    AuthRedirectPort, ClockPort, LocalCachePort, ProgressClientError, ProgressRemotePort,
    UnlockSignalPort,
};
use vg_core::{
    Advance, Identity, ItemLocator, PlayerGate, ProgressAction, ProgressError, ProgressRecord,
    ProgressStateMachine, Sequence,
};

use super::auth_guard::AuthGuard;
use super::pending::{PendingOperation, PendingOperations};
use super::remote_writer::RemoteWriter;

/// Read model for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub position: usize,
    pub completed: bool,
    /// UnlockFlag as currently cached on this device.
    pub unlocked: bool,
    /// The last remote call failed. Generic indicator only.
    pub sync_error: bool,
}

/// Helper for constructing the tracker with explicit dependency fields.
pub struct ProgressTrackerDeps {
    pub sequence: Sequence,
    pub identity: Option<Identity>,
    pub remote: Arc<dyn ProgressRemotePort>,
    pub cache: Arc<dyn LocalCachePort>,
    pub unlock_signal: Arc<dyn UnlockSignalPort>,
    pub auth_redirect: Arc<dyn AuthRedirectPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Orchestrator that owns the participant's progress for one session.
pub struct ProgressTracker {
    sequence: Sequence,
    identity: Option<Identity>,
    machine: Mutex<ProgressStateMachine>,
    remote: Arc<dyn ProgressRemotePort>,
    cache: Arc<dyn LocalCachePort>,
    unlock_signal: Arc<dyn UnlockSignalPort>,
    auth: Arc<AuthGuard>,
    pending: Arc<PendingOperations>,
    writer: RemoteWriter,
}

impl ProgressTracker {
    /// Construct a tracker from its dependency bundle.
    ///
    /// Spawns the remote writer task, so this must run inside a tokio runtime.
    pub fn from_deps(deps: ProgressTrackerDeps) -> Self {
        let ProgressTrackerDeps {
            sequence,
            identity,
            remote,
            cache,
            unlock_signal,
            auth_redirect,
            clock,
        } = deps;

        let auth = Arc::new(AuthGuard::new(auth_redirect));
        let pending = Arc::new(PendingOperations::new());
        let writer = RemoteWriter::spawn(
            remote.clone(),
            identity.clone(),
            pending.clone(),
            auth.clone(),
            clock,
        );

        Self {
            machine: Mutex::new(ProgressStateMachine::new(&sequence)),
            sequence,
            identity,
            remote,
            cache,
            unlock_signal,
            auth,
            pending,
            writer,
        }
    }

    /// Seed the state from the progress service.
    ///
    /// Never fails: on any fetch failure the tracker keeps `{0, false}`, logs
    /// the condition and accepts advances from the start.
    pub async fn hydrate(&self) -> ProgressRecord {
        let span = info_span!("usecase.progress.hydrate");

        async {
            let fetched = match &self.identity {
                Some(identity) => self.remote.fetch(identity).await,
                None => Err(ProgressClientError::Unauthenticated),
            };

            match fetched {
                Ok(remote) => {
                    let actions = self.lock_machine().hydrate(remote);
                    self.pending.set_sync_error(false);
                    self.execute(actions).await;

                    let record = self.record();
                    info!(
                        position = record.position,
                        completed = record.completed,
                        "Progress hydrated from remote"
                    );
                    record
                }
                Err(err) => {
                    warn!(error = %err, "Failed to fetch progress, starting from the beginning");
                    self.auth.observe(&err);
                    self.pending.set_sync_error(true);
                    self.lock_machine().hydrate_failed();
                    self.record()
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Record that the current item was watched to the end.
    ///
    /// State is updated before anything is persisted; the save is queued and
    /// not awaited. On completion the UnlockFlag is cached and the host is
    /// signalled once.
    pub async fn advance(&self) -> Result<Advance, ProgressError> {
        let span = info_span!("usecase.progress.advance");

        async {
            let advance = self.lock_machine().advance();
            let advance = match advance {
                Ok(advance) => advance,
                Err(err) => {
                    warn!(error = %err, "Rejected advance");
                    return Err(err);
                }
            };

            info!(
                next_position = advance.next_position,
                just_completed = advance.just_completed,
                "Advanced progress"
            );
            self.execute(advance.actions.clone()).await;
            Ok(advance)
        }
        .instrument(span)
        .await
    }

    /// Restart the sequence: in-memory state and UnlockFlag are cleared
    /// whatever happens to the remote clear.
    pub async fn reset(&self) {
        let span = info_span!("usecase.progress.reset");

        async {
            let actions = self.lock_machine().reset();
            self.execute(actions).await;
            info!("Progress reset");
        }
        .instrument(span)
        .await
    }

    pub fn record(&self) -> ProgressRecord {
        self.lock_machine().record()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let record = self.record();
        ProgressSnapshot {
            position: record.position,
            completed: record.completed,
            unlocked: self.cached_unlock_flag(),
            sync_error: self.pending.has_sync_error(),
        }
    }

    pub fn gate(&self) -> PlayerGate {
        PlayerGate::resolve(self.record(), self.cached_unlock_flag(), &self.sequence)
    }

    /// Item the player should render next, if any.
    pub fn current_item(&self) -> Option<ItemLocator> {
        let record = self.record();
        if record.completed {
            return None;
        }
        self.sequence.item(record.position).cloned()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn pending_operations(&self) -> Vec<PendingOperation> {
        self.pending.snapshot()
    }

    /// Remote writes queued or being sent right now.
    pub fn in_flight_count(&self) -> usize {
        self.pending.in_flight_count()
    }

    /// Wait until every queued remote write has resolved.
    pub async fn settle(&self) {
        self.pending.settle().await;
    }

    async fn execute(&self, actions: Vec<ProgressAction>) {
        for action in actions {
            match action {
                ProgressAction::Persist(record) => self.writer.save(record),
                ProgressAction::ClearRemote => self.writer.clear(),
                ProgressAction::StoreUnlockFlag => {
                    if let Err(err) = self.cache.set_unlock_flag() {
                        error!(error = %err, "Failed to cache unlock flag");
                    }
                }
                ProgressAction::ClearUnlockFlag => {
                    if let Err(err) = self.cache.clear_unlock_flag() {
                        error!(error = %err, "Failed to clear cached unlock flag");
                    }
                }
                ProgressAction::SignalUnlock => match self.unlock_signal.emit_unlocked().await {
                    Ok(()) => debug!("Unlock signal delivered"),
                    Err(err) => error!(error = %err, "Failed to deliver unlock signal"),
                },
            }
        }
    }

    fn cached_unlock_flag(&self) -> bool {
        self.cache.unlock_flag().unwrap_or_else(|err| {
            warn!(error = %err, "Failed to read cached unlock flag");
            false
        })
    }

    fn lock_machine(&self) -> MutexGuard<'_, ProgressStateMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
