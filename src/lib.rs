//! VideoGate Library
//!
//! Host application for the instructional video phase of the study: wires the
//! progress tracker to the progress service and the local cache, and drives it
//! from playback events.

pub mod adapters;
pub mod bootstrap;

pub use bootstrap::run_app;
