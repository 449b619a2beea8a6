//! Participant progress through the sequence.

mod error;
mod gate;
mod record;
mod state_machine;

pub use error::{ProgressError, TransitionRejection};
pub use gate::PlayerGate;
pub use record::ProgressRecord;
pub use state_machine::{Advance, ProgressAction, ProgressStateMachine};
