pub mod progress;

pub use progress::{
    OperationKind, OperationStatus, PendingOperation, ProgressSnapshot, ProgressTracker,
    ProgressTrackerDeps,
};
