use super::record::ProgressRecord;
use crate::sequence::{ItemLocator, Sequence};

/// What the presentation layer should show.
///
/// The player is only rendered while the participant is still watching; once
/// the sequence is completed, or the UnlockFlag is cached on this device,
/// playback is never re-armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerGate {
    /// Play `item`, the next unwatched one.
    Watching { position: usize, item: ItemLocator },
    /// Sequence watched; the next phase may be entered.
    Unlocked,
    /// Sequence watched but the unlock was not cached here. One attempt only.
    AttemptUsed,
    /// Position is past the last item but the sequence was never recorded
    /// as watched. Nothing to play; only restart is offered.
    Exhausted,
}

impl PlayerGate {
    pub fn resolve(record: ProgressRecord, unlock_flag: bool, sequence: &Sequence) -> Self {
        if unlock_flag {
            return Self::Unlocked;
        }
        if record.completed {
            return Self::AttemptUsed;
        }

        match sequence.item(record.position) {
            Some(item) => Self::Watching {
                position: record.position,
                item: item.clone(),
            },
            None => Self::Exhausted,
        }
    }

    pub fn shows_player(&self) -> bool {
        matches!(self, Self::Watching { .. })
    }

    /// Restart is offered only before the sequence has been completed.
    pub fn can_restart(&self) -> bool {
        matches!(self, Self::Watching { .. } | Self::Exhausted)
    }
}
