use serde::{Deserialize, Serialize};

/// Position in the sequence plus the completion flag.
///
/// `position` is the index of the next unwatched item; `position == N` means
/// the sequence is exhausted. `completed` implies `position == N` once the
/// record has been [normalized](ProgressRecord::normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub position: usize,
    pub completed: bool,
}

impl ProgressRecord {
    /// `{0, false}`: nothing watched since the last reset.
    pub const fn start() -> Self {
        Self {
            position: 0,
            completed: false,
        }
    }

    pub const fn new(position: usize, completed: bool) -> Self {
        Self {
            position,
            completed,
        }
    }

    /// Fit a record from an untrusted source to a sequence of `total` items.
    ///
    /// Only the completion flag decides `completed`. The position is clamped
    /// to `total`, and a completed record always sits at `total`.
    pub fn normalized(self, total: usize) -> Self {
        let position = if self.completed {
            total
        } else {
            self.position.min(total)
        };
        Self {
            position,
            completed: self.completed,
        }
    }
}
