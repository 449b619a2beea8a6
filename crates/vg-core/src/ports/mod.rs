//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. The progress tracker only ever talks
//! to these traits, so it can run against a real browser-like cache and HTTP
//! service, or against in-memory fakes in tests.

pub mod auth_redirect;
mod clock;
pub mod local_cache;
pub mod progress_remote;
pub mod unlock_signal;

pub use auth_redirect::AuthRedirectPort;
pub use clock::*;
pub use local_cache::{LocalCacheError, LocalCachePort, UNLOCK_FLAG_KEY};
pub use progress_remote::{FailureKind, ProgressClientError, ProgressRemotePort};
pub use unlock_signal::UnlockSignalPort;

#[cfg(test)]
pub use local_cache::MockLocalCache;
