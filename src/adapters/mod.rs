mod host;

pub use host::{ConsoleUnlockSignal, LoginRedirect};
