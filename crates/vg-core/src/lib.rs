//! # vg-core
//!
//! Core domain models and business logic for VideoGate.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the video sequence, participant identity, the progress state machine and the
//! port traits implemented by the infrastructure layer.

// Public module exports
pub mod config;
pub mod identity;
pub mod ports;
pub mod progress;
pub mod sequence;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use identity::{BearerToken, Identity, IdentityError, ParticipantKey};
pub use progress::{
    Advance, PlayerGate, ProgressAction, ProgressError, ProgressRecord, ProgressStateMachine,
    TransitionRejection,
};
pub use sequence::{ItemLocator, Sequence, SequenceError};
