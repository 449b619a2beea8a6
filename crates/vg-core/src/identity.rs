//! Participant identity.
//!
//! Identity is issued by the authentication flow, which is not part of this
//! crate. The core only reads it back from the local cache and carries it
//! opaquely to the progress service.

use std::fmt;

use thiserror::Error;

use crate::ports::{LocalCacheError, LocalCachePort};

/// Cache key under which the auth flow stores the participant key.
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Cache key under which the auth flow stores the bearer credential.
pub const AUTH_TOKEN_KEY: &str = "authToken";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("participant key is blank")]
    BlankParticipant,

    #[error("bearer credential is blank")]
    BlankCredential,
}

/// Opaque participant key (email-like).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantKey(String);

impl ParticipantKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Participant key plus credential, immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    participant: ParticipantKey,
    credential: BearerToken,
}

impl Identity {
    pub fn new(
        participant: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let participant = participant.into();
        let credential = credential.into();

        if participant.trim().is_empty() {
            return Err(IdentityError::BlankParticipant);
        }
        if credential.trim().is_empty() {
            return Err(IdentityError::BlankCredential);
        }

        Ok(Self {
            participant: ParticipantKey(participant),
            credential: BearerToken(credential),
        })
    }

    /// Read the identity the auth flow left in the local cache.
    ///
    /// Returns `Ok(None)` when either key is missing or blank; callers treat
    /// that as an unauthenticated participant.
    pub fn from_cache(cache: &dyn LocalCachePort) -> Result<Option<Self>, LocalCacheError> {
        let participant = cache.get(USER_EMAIL_KEY)?;
        let credential = cache.get(AUTH_TOKEN_KEY)?;

        Ok(match (participant, credential) {
            (Some(participant), Some(credential)) => Self::new(participant, credential).ok(),
            _ => None,
        })
    }

    pub fn participant(&self) -> &ParticipantKey {
        &self.participant
    }

    pub fn credential(&self) -> &BearerToken {
        &self.credential
    }
}
