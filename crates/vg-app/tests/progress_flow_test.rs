use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use vg_app::usecases::{OperationKind, OperationStatus};
use vg_app::{ProgressTracker, ProgressTrackerDeps};
use vg_core::ports::{
    AuthRedirectPort, ClockPort, FailureKind, LocalCacheError, LocalCachePort,
    ProgressClientError, ProgressRemotePort, UnlockSignalPort, UNLOCK_FLAG_KEY,
};
use vg_core::{
    Identity, PlayerGate, ProgressError, ProgressRecord, Sequence, TransitionRejection,
};

#[tokio::test]
async fn progress_flow_resumes_and_unlocks_after_last_video() {
    let harness = Harness::new(Ok(ProgressRecord::new(1, false)));

    let hydrated = harness.tracker.hydrate().await;
    assert_eq!(hydrated, ProgressRecord::new(1, false));

    let advance = harness.tracker.advance().await.expect("second video");
    assert_eq!(advance.next_position, 2);
    assert!(!advance.just_completed);
    assert_eq!(harness.tracker.record(), ProgressRecord::new(2, false));
    assert_eq!(harness.unlock.count(), 0);

    let advance = harness.tracker.advance().await.expect("third video");
    assert_eq!(advance.next_position, 3);
    assert!(advance.just_completed);
    assert_eq!(harness.tracker.record(), ProgressRecord::new(3, true));
    assert_eq!(harness.unlock.count(), 1);
    assert!(harness.cache.unlock_flag().unwrap());

    harness.tracker.settle().await;
    assert_eq!(
        harness.remote.calls(),
        vec![
            RemoteCall::Fetch,
            RemoteCall::Save(ProgressRecord::new(2, false)),
            RemoteCall::Save(ProgressRecord::new(3, true)),
        ]
    );
    assert_eq!(harness.tracker.gate(), PlayerGate::Unlocked);
}

#[tokio::test]
async fn progress_flow_network_failure_starts_fresh() {
    let harness = Harness::new(Err(ProgressClientError::Network(
        "connection refused".into(),
    )));

    let hydrated = harness.tracker.hydrate().await;
    assert_eq!(hydrated, ProgressRecord::start());
    assert!(harness.tracker.snapshot().sync_error);

    let advance = harness.tracker.advance().await.expect("first video");
    assert_eq!(advance.next_position, 1);
    assert!(!advance.just_completed);
    assert_eq!(harness.redirect.count(), 0);
}

#[tokio::test]
async fn progress_flow_advance_waits_for_hydration() {
    let harness = Harness::new(Ok(ProgressRecord::start()));

    let result = harness.tracker.advance().await;

    assert_eq!(
        result.unwrap_err(),
        ProgressError::InvalidTransition(TransitionRejection::NotHydrated)
    );
    assert!(harness.remote.calls().is_empty());
}

#[tokio::test]
async fn progress_flow_spurious_advance_after_completion_is_rejected() {
    let harness = Harness::new(Ok(ProgressRecord::new(2, false)));
    harness.tracker.hydrate().await;
    harness.tracker.advance().await.expect("last video");

    let result = harness.tracker.advance().await;

    assert_eq!(
        result.unwrap_err(),
        ProgressError::InvalidTransition(TransitionRejection::AlreadyCompleted)
    );
    assert_eq!(harness.tracker.record(), ProgressRecord::new(3, true));
    assert_eq!(harness.unlock.count(), 1);
}

#[tokio::test]
async fn progress_flow_hydrate_completed_record_restores_flag_without_signal() {
    let harness = Harness::new(Ok(ProgressRecord::new(3, true)));

    harness.tracker.hydrate().await;

    assert!(harness.cache.unlock_flag().unwrap());
    assert_eq!(harness.unlock.count(), 0);
    assert_eq!(harness.tracker.gate(), PlayerGate::Unlocked);
    assert_eq!(harness.tracker.current_item(), None);
}

#[tokio::test]
async fn progress_flow_remote_state_overrides_stale_cached_flag() {
    let harness = Harness::new(Ok(ProgressRecord::new(1, false)));
    harness.cache.set(UNLOCK_FLAG_KEY, "true").unwrap();
    assert_eq!(harness.tracker.gate(), PlayerGate::Unlocked);

    harness.tracker.hydrate().await;

    assert!(!harness.cache.unlock_flag().unwrap());
    assert!(harness.tracker.gate().shows_player());
}

#[tokio::test]
async fn progress_flow_reset_clears_state_even_when_remote_fails() {
    let harness = Harness::new(Ok(ProgressRecord::new(2, false)));
    harness.tracker.hydrate().await;
    harness.tracker.advance().await.expect("last video");
    harness
        .remote
        .fail_clears(ProgressClientError::Server { status: 500 });

    harness.tracker.reset().await;
    harness.tracker.settle().await;

    let snapshot = harness.tracker.snapshot();
    assert_eq!(snapshot.position, 0);
    assert!(!snapshot.completed);
    assert!(!snapshot.unlocked);
    assert!(snapshot.sync_error);
    assert!(harness.tracker.gate().can_restart());

    let last = harness.tracker.pending_operations().pop().expect("clear");
    assert_eq!(last.kind, OperationKind::Clear);
    assert_eq!(last.status, OperationStatus::Failed(FailureKind::ServerError));
}

#[tokio::test]
async fn progress_flow_reset_twice_matches_single_reset() {
    let harness = Harness::new(Ok(ProgressRecord::new(1, false)));
    harness.tracker.hydrate().await;

    harness.tracker.reset().await;
    let once = harness.tracker.snapshot();
    harness.tracker.reset().await;
    let twice = harness.tracker.snapshot();

    assert_eq!(once, twice);
    assert_eq!(harness.tracker.record(), ProgressRecord::start());
}

#[tokio::test]
async fn progress_flow_reset_supersedes_queued_save() {
    let harness = Harness::new(Ok(ProgressRecord::start()));
    harness.tracker.hydrate().await;

    // No await point between these calls, so the writer has not run yet.
    harness.tracker.advance().await.expect("first video");
    harness.tracker.reset().await;
    assert_eq!(harness.tracker.in_flight_count(), 2);
    harness.tracker.settle().await;

    assert_eq!(harness.tracker.in_flight_count(), 0);
    assert_eq!(
        harness.remote.calls(),
        vec![RemoteCall::Fetch, RemoteCall::Clear]
    );
    let statuses: Vec<_> = harness
        .tracker
        .pending_operations()
        .into_iter()
        .map(|operation| (operation.kind, operation.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (
                OperationKind::Save(ProgressRecord::new(1, false)),
                OperationStatus::Superseded
            ),
            (OperationKind::Clear, OperationStatus::Succeeded),
        ]
    );
}

#[tokio::test]
async fn progress_flow_in_flight_save_lands_before_clear() {
    let harness = Harness::new(Ok(ProgressRecord::start()));
    harness.remote.hold_saves();
    harness.tracker.hydrate().await;

    harness.tracker.advance().await.expect("first video");
    while harness.remote.saves_started() == 0 {
        tokio::task::yield_now().await;
    }
    harness.tracker.reset().await;
    harness.remote.release_saves();
    harness.tracker.settle().await;

    assert_eq!(
        harness.remote.calls(),
        vec![
            RemoteCall::Fetch,
            RemoteCall::Save(ProgressRecord::new(1, false)),
            RemoteCall::Clear,
        ]
    );
}

#[tokio::test]
async fn progress_flow_missing_identity_redirects_and_still_tracks() {
    let harness = Harness::build(Ok(ProgressRecord::start()), None);

    harness.tracker.hydrate().await;
    harness.tracker.advance().await.expect("first video");
    harness.tracker.settle().await;

    assert_eq!(harness.redirect.count(), 1);
    assert!(harness.remote.calls().is_empty());
    assert_eq!(harness.tracker.record(), ProgressRecord::new(1, false));
    assert_eq!(
        harness.tracker.pending_operations()[0].status,
        OperationStatus::Failed(FailureKind::Unauthenticated)
    );
}

#[tokio::test]
async fn progress_flow_pending_operations_record_start_time() {
    let harness = Harness::new(Ok(ProgressRecord::start()));
    harness.tracker.hydrate().await;

    harness.tracker.advance().await.expect("first video");
    harness.tracker.settle().await;

    let operation = &harness.tracker.pending_operations()[0];
    assert_eq!(operation.started_at_ms, FIXED_NOW_MS);
    assert_eq!(operation.generation, 0);
    assert_eq!(operation.status, OperationStatus::Succeeded);
}

const FIXED_NOW_MS: i64 = 1_737_100_000_000;

struct Harness {
    tracker: ProgressTracker,
    remote: Arc<FakeRemote>,
    cache: Arc<MemoryCache>,
    unlock: Arc<CountingUnlock>,
    redirect: Arc<CountingRedirect>,
}

impl Harness {
    fn new(fetch: Result<ProgressRecord, ProgressClientError>) -> Self {
        Self::build(fetch, Some(Identity::new("u@x.com", "token").unwrap()))
    }

    fn build(
        fetch: Result<ProgressRecord, ProgressClientError>,
        identity: Option<Identity>,
    ) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let remote = Arc::new(FakeRemote::new(fetch));
        let cache = Arc::new(MemoryCache::default());
        let unlock = Arc::new(CountingUnlock::default());
        let redirect = Arc::new(CountingRedirect::default());

        let tracker = ProgressTracker::from_deps(ProgressTrackerDeps {
            sequence: Sequence::agent_videos(),
            identity,
            remote: remote.clone(),
            cache: cache.clone(),
            unlock_signal: unlock.clone(),
            auth_redirect: redirect.clone(),
            clock: Arc::new(FixedClock),
        });

        Self {
            tracker,
            remote,
            cache,
            unlock,
            redirect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RemoteCall {
    Fetch,
    Save(ProgressRecord),
    Clear,
}

struct FakeRemote {
    fetch: Result<ProgressRecord, ProgressClientError>,
    clear_error: Mutex<Option<ProgressClientError>>,
    calls: Mutex<Vec<RemoteCall>>,
    save_gate: Mutex<Option<Arc<Semaphore>>>,
    saves_started: AtomicUsize,
}

impl FakeRemote {
    fn new(fetch: Result<ProgressRecord, ProgressClientError>) -> Self {
        Self {
            fetch,
            clear_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            save_gate: Mutex::new(None),
            saves_started: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_clears(&self, error: ProgressClientError) {
        *self.clear_error.lock().unwrap() = Some(error);
    }

    fn hold_saves(&self) {
        *self.save_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    fn release_saves(&self) {
        if let Some(gate) = self.save_gate.lock().unwrap().as_ref() {
            gate.add_permits(16);
        }
    }

    fn saves_started(&self) -> usize {
        self.saves_started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressRemotePort for FakeRemote {
    async fn fetch(&self, _identity: &Identity) -> Result<ProgressRecord, ProgressClientError> {
        self.calls.lock().unwrap().push(RemoteCall::Fetch);
        self.fetch.clone()
    }

    async fn save(
        &self,
        _identity: &Identity,
        record: ProgressRecord,
    ) -> Result<(), ProgressClientError> {
        self.saves_started.fetch_add(1, Ordering::SeqCst);
        let gate = self.save_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }
        self.calls.lock().unwrap().push(RemoteCall::Save(record));
        Ok(())
    }

    async fn clear(&self, _identity: &Identity) -> Result<(), ProgressClientError> {
        self.calls.lock().unwrap().push(RemoteCall::Clear);
        match self.clear_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl LocalCachePort for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, LocalCacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalCacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalCacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct CountingUnlock {
    calls: AtomicUsize,
}

impl CountingUnlock {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnlockSignalPort for CountingUnlock {
    async fn emit_unlocked(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct CountingRedirect {
    calls: AtomicUsize,
}

impl CountingRedirect {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AuthRedirectPort for CountingRedirect {
    fn redirect_to_login(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        FIXED_NOW_MS
    }
}
