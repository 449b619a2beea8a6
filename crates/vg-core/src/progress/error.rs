use thiserror::Error;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionRejection {
    #[error("the sequence has already been completed")]
    AlreadyCompleted,

    #[error("progress has not been hydrated yet")]
    NotHydrated,
}

/// Errors emitted by the progress state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionRejection),
}
