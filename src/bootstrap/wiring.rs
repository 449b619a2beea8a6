//! Assembles the progress tracker from configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use vg_app::{ProgressTracker, ProgressTrackerDeps};
use vg_core::config::AppConfig;
use vg_core::ports::LocalCachePort;
use vg_core::Identity;
use vg_infra::{FileLocalCache, HttpProgressClient, SystemClock};

use super::paths::AppPaths;
use crate::adapters::{ConsoleUnlockSignal, LoginRedirect};

/// Build a tracker backed by the file cache and the HTTP progress service.
///
/// Must be called from within a Tokio runtime: the tracker spawns its remote
/// writer task on construction. A participant with no cached identity still
/// gets a tracker; the first remote call sends them to the login page.
pub fn build_tracker(config: &AppConfig, paths: &AppPaths) -> anyhow::Result<ProgressTracker> {
    let sequence = config
        .sequence()
        .context("Invalid instructional sequence in configuration")?;

    let cache_path = config
        .cache
        .path
        .clone()
        .unwrap_or_else(|| paths.cache_path.clone());
    let cache: Arc<dyn LocalCachePort> = Arc::new(FileLocalCache::new(cache_path.clone()));

    let identity = Identity::from_cache(cache.as_ref())
        .with_context(|| format!("Failed to read identity from {}", cache_path.display()))?;
    match &identity {
        Some(identity) => info!(participant = %identity.participant(), "Participant identified"),
        None => warn!(cache = %cache_path.display(), "No participant identity cached"),
    }

    let remote = HttpProgressClient::from_config(&config.api)?;

    Ok(ProgressTracker::from_deps(ProgressTrackerDeps {
        sequence,
        identity,
        remote: Arc::new(remote),
        cache,
        unlock_signal: Arc::new(ConsoleUnlockSignal::new()),
        auth_redirect: Arc::new(LoginRedirect::new(config.auth.login_url.clone())),
        clock: Arc::new(SystemClock),
    }))
}
