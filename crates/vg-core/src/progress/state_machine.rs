//! Progress state machine.
//!
//! Pure transition logic: every operation mutates the in-memory record and
//! returns the side-effects the caller has to carry out. No I/O happens here.

use super::error::{ProgressError, TransitionRejection};
use super::record::ProgressRecord;
use crate::sequence::Sequence;

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressAction {
    /// Write the record to the progress service (best-effort).
    Persist(ProgressRecord),
    /// Reset the remote record to `{0, false}` (best-effort).
    ClearRemote,
    /// Set the UnlockFlag in the local cache.
    StoreUnlockFlag,
    /// Remove the UnlockFlag from the local cache.
    ClearUnlockFlag,
    /// Tell the host application the next phase is unlocked.
    SignalUnlock,
}

/// Result of a successful [`ProgressStateMachine::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub next_position: usize,
    pub just_completed: bool,
    pub actions: Vec<ProgressAction>,
}

#[derive(Debug, Clone)]
pub struct ProgressStateMachine {
    total: usize,
    record: ProgressRecord,
    hydrated: bool,
}

impl ProgressStateMachine {
    pub fn new(sequence: &Sequence) -> Self {
        Self {
            total: sequence.len(),
            record: ProgressRecord::start(),
            hydrated: false,
        }
    }

    pub fn record(&self) -> ProgressRecord {
        self.record
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Seed the state from the authoritative remote record.
    ///
    /// The remote value wins over whatever the local cache holds, so the
    /// UnlockFlag is rewritten to match.
    pub fn hydrate(&mut self, remote: ProgressRecord) -> Vec<ProgressAction> {
        self.record = remote.normalized(self.total);
        self.hydrated = true;

        if self.record.completed {
            vec![ProgressAction::StoreUnlockFlag]
        } else {
            vec![ProgressAction::ClearUnlockFlag]
        }
    }

    /// The fetch failed for good: keep the current state and accept advances.
    pub fn hydrate_failed(&mut self) {
        self.hydrated = true;
    }

    /// One item has been watched to the end.
    ///
    /// The unlock decision is taken on the in-memory position alone; the
    /// returned `Persist` is never waited for and never rolled back.
    pub fn advance(&mut self) -> Result<Advance, ProgressError> {
        if !self.hydrated {
            return Err(TransitionRejection::NotHydrated.into());
        }
        if self.record.completed {
            return Err(TransitionRejection::AlreadyCompleted.into());
        }

        let next = self.record.position + 1;
        if next >= self.total {
            self.record = ProgressRecord::new(self.total, true);
            return Ok(Advance {
                next_position: self.total,
                just_completed: true,
                actions: vec![
                    ProgressAction::Persist(self.record),
                    ProgressAction::StoreUnlockFlag,
                    ProgressAction::SignalUnlock,
                ],
            });
        }

        self.record.position = next;
        Ok(Advance {
            next_position: next,
            just_completed: false,
            actions: vec![ProgressAction::Persist(self.record)],
        })
    }

    /// Back to `{0, false}` from any state.
    ///
    /// The reset state is known, so advances are accepted afterwards even if
    /// hydration never ran.
    pub fn reset(&mut self) -> Vec<ProgressAction> {
        self.record = ProgressRecord::start();
        self.hydrated = true;
        vec![ProgressAction::ClearRemote, ProgressAction::ClearUnlockFlag]
    }
}
