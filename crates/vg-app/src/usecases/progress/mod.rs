//! Progress use cases.
//!
//! This module exposes the progress tracker.

mod auth_guard;
mod pending;
mod remote_writer;
pub mod tracker;

pub use pending::{OperationKind, OperationStatus, PendingOperation};
pub use tracker::{ProgressSnapshot, ProgressTracker, ProgressTrackerDeps};
