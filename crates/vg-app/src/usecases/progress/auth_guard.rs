use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;
use vg_core::ports::{AuthRedirectPort, ProgressClientError};

/// Sends the participant to the login flow on the first Unauthenticated
/// outcome, and only once per tracker.
pub(crate) struct AuthGuard {
    redirect: Arc<dyn AuthRedirectPort>,
    redirected: AtomicBool,
}

impl AuthGuard {
    pub(crate) fn new(redirect: Arc<dyn AuthRedirectPort>) -> Self {
        Self {
            redirect,
            redirected: AtomicBool::new(false),
        }
    }

    pub(crate) fn observe(&self, error: &ProgressClientError) {
        if !matches!(error, ProgressClientError::Unauthenticated) {
            return;
        }
        if self.redirected.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!("Participant is not authenticated, redirecting to login");
        self.redirect.redirect_to_login();
    }
}
