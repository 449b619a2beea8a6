//! VideoGate Application Orchestration Layer
//!
//! This crate contains the progress use cases and their runtime orchestration.

pub mod usecases;

pub use usecases::{ProgressSnapshot, ProgressTracker, ProgressTrackerDeps};
