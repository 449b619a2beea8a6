//! Host-side port implementations for the console driver.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};
use vg_core::ports::{AuthRedirectPort, UnlockSignalPort};

/// Announces the Gender Identification phase on stdout.
#[derive(Default)]
pub struct ConsoleUnlockSignal {
    emitted: AtomicUsize,
}

impl ConsoleUnlockSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnlockSignalPort for ConsoleUnlockSignal {
    async fn emit_unlocked(&self) -> Result<()> {
        self.emitted.fetch_add(1, Ordering::SeqCst);
        info!("Gender Identification unlocked");
        println!("Gender Identification is now unlocked.");
        Ok(())
    }
}

/// Points the participant at the login page.
pub struct LoginRedirect {
    login_url: String,
}

impl LoginRedirect {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

impl AuthRedirectPort for LoginRedirect {
    fn redirect_to_login(&self) {
        warn!(login_url = %self.login_url, "Redirecting participant to login");
        println!("Please log in at {} and start again.", self.login_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlock_signal_counts_emissions() {
        let signal = ConsoleUnlockSignal::new();

        signal.emit_unlocked().await.unwrap();

        assert_eq!(signal.emitted(), 1);
    }
}
