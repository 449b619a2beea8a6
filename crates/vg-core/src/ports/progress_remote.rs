//! Progress service port
//!
//! The remote service is the source of truth for a participant's progress.
//! Every call resolves to a value or one of four failure kinds; nothing is
//! allowed to escape the boundary as a panic.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::Identity;
use crate::progress::ProgressRecord;

/// Failures of a remote progress call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressClientError {
    /// Missing identity, or the service rejected the credential.
    #[error("participant is not authenticated")]
    Unauthenticated,

    #[error("network error: {0}")]
    Network(String),

    #[error("progress service responded with status {status}")]
    Server { status: u16 },

    #[error("malformed progress response: {0}")]
    MalformedResponse(String),
}

/// Payload-free classification of [`ProgressClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unauthenticated,
    NetworkError,
    ServerError,
    MalformedResponse,
}

impl ProgressClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated => FailureKind::Unauthenticated,
            Self::Network(_) => FailureKind::NetworkError,
            Self::Server { .. } => FailureKind::ServerError,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::MalformedResponse => "malformed_response",
        };
        f.write_str(name)
    }
}

/// Canonical progress storage.
#[async_trait]
pub trait ProgressRemotePort: Send + Sync {
    /// Fetch the participant's record. A participant without a stored record
    /// gets `{0, false}`.
    async fn fetch(&self, identity: &Identity) -> Result<ProgressRecord, ProgressClientError>;

    /// Overwrite the participant's record.
    async fn save(
        &self,
        identity: &Identity,
        record: ProgressRecord,
    ) -> Result<(), ProgressClientError>;

    /// Reset the participant's record back to `{0, false}`.
    async fn clear(&self, identity: &Identity) -> Result<(), ProgressClientError>;
}
