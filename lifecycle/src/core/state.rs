//! Suite lifecycle tracking
//!
//! Shared bookkeeping for every runner of a suite: how many runners are still
//! active, the adaptor that was started for the suite, and the failure that
//! poisoned the suite if starting it went wrong. Every mutation happens under a
//! single lock so concurrently constructed and finishing runners cannot lose
//! counts or observe a half-initialized adaptor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::error::{AdaptorError, LifecycleError, LifecycleResult};
use crate::traits::SuiteAdaptor;

#[derive(Default)]
struct TrackerState {
    runner_count: usize,
    adaptor: Option<Arc<dyn SuiteAdaptor>>,
    initialization_failure: Option<Arc<AdaptorError>>,
}

/// Lock-guarded record of the suite's active runners, adaptor and setup failure
pub struct SuiteLifecycleTracker {
    state: Mutex<TrackerState>,
    /// Serializes the check-build-store sequence of adaptor initialization
    setup_gate: tokio::sync::Mutex<()>,
    cleanups: AtomicU64,
}

impl SuiteLifecycleTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState::default()),
            setup_gate: tokio::sync::Mutex::new(()),
            cleanups: AtomicU64::new(0),
        }
    }

    // A runner that panicked while holding the lock leaves plain data behind,
    // so the state stays usable for the remaining runners.
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a newly constructed runner
    ///
    /// # Returns
    /// Number of active runners including the new one
    pub fn runner_started(&self) -> usize {
        let mut state = self.lock();
        state.runner_count += 1;
        state.runner_count
    }

    /// Deregister a runner whose run has completed
    ///
    /// # Returns
    /// Number of runners still active
    pub fn runner_finished(&self) -> usize {
        let mut state = self.lock();
        Self::decrement(&mut state);
        state.runner_count
    }

    /// Deregister a runner and report whether it was the last active one
    ///
    /// Both steps happen under one lock acquisition, so out of several runners
    /// finishing at the same time exactly one sees `true`. A finish without a
    /// matching start never counts as the last runner.
    pub fn finish_runner(&self) -> bool {
        let mut state = self.lock();
        Self::decrement(&mut state) && state.runner_count == 0
    }

    fn decrement(state: &mut TrackerState) -> bool {
        match state.runner_count.checked_sub(1) {
            Some(remaining) => {
                state.runner_count = remaining;
                true
            }
            None => {
                warn!("⚠️ Runner finished without any active runner");
                false
            }
        }
    }

    /// True once every started runner has finished
    pub fn is_last_runner(&self) -> bool {
        self.lock().runner_count == 0
    }

    pub fn runner_count(&self) -> usize {
        self.lock().runner_count
    }

    pub fn has_test_adaptor(&self) -> bool {
        self.lock().adaptor.is_some()
    }

    pub fn has_initialization_exception(&self) -> bool {
        self.lock().initialization_failure.is_some()
    }

    /// Failure captured while starting the suite
    pub fn initialization_exception(&self) -> LifecycleResult<Arc<AdaptorError>> {
        self.lock()
            .initialization_failure
            .clone()
            .ok_or(LifecycleError::NoInitializationFailure)
    }

    /// Hand a started adaptor over to the tracker
    ///
    /// Refused once a setup failure has been recorded: a poisoned suite never
    /// gets an adaptor until it is cleaned.
    pub fn set_test_adaptor(&self, adaptor: Arc<dyn SuiteAdaptor>) -> LifecycleResult<()> {
        let mut state = self.lock();
        if let Some(failure) = &state.initialization_failure {
            return Err(LifecycleError::PreviousInitializationFailed {
                source: Arc::clone(failure),
            });
        }
        if state.adaptor.is_some() {
            warn!("⚠️ Replacing an already registered suite adaptor");
        }
        state.adaptor = Some(adaptor);
        Ok(())
    }

    /// Borrow the running adaptor for the duration of a call
    pub fn test_adaptor(&self) -> LifecycleResult<Arc<dyn SuiteAdaptor>> {
        self.lock().adaptor.clone().ok_or(LifecycleError::NoTestAdaptor)
    }

    /// Record the failure that prevented the suite from starting
    ///
    /// # Returns
    /// The shared failure, for reporting against the caller's own tests
    pub fn caught_initialization_exception(&self, error: AdaptorError) -> Arc<AdaptorError> {
        let failure = Arc::new(error);
        let mut state = self.lock();
        state.adaptor = None;
        state.initialization_failure = Some(Arc::clone(&failure));
        failure
    }

    /// Forget the adaptor and any setup failure
    ///
    /// The runner count is untouched: it returns to zero on its own as runners finish.
    pub fn clean(&self) {
        let mut state = self.lock();
        state.adaptor = None;
        state.initialization_failure = None;
        drop(state);
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        debug!("🧹 Suite lifecycle state cleaned");
    }

    /// Return to the state of a fresh process
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = TrackerState::default();
        drop(state);
        self.cleanups.store(0, Ordering::SeqCst);
    }

    /// Number of times the suite state has been cleaned
    pub fn cleanups(&self) -> u64 {
        self.cleanups.load(Ordering::SeqCst)
    }

    /// Guard that cleans the suite state when dropped
    pub fn cleanup_guard(&self) -> SuiteCleanup<'_> {
        SuiteCleanup { tracker: self }
    }

    /// Hold while checking for and initializing the adaptor
    pub async fn setup_gate(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.setup_gate.lock().await
    }
}

impl Default for SuiteLifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope guard running [`SuiteLifecycleTracker::clean`] on every exit path
#[must_use = "the suite state is cleaned as soon as the guard is dropped"]
pub struct SuiteCleanup<'a> {
    tracker: &'a SuiteLifecycleTracker,
}

impl Drop for SuiteCleanup<'_> {
    fn drop(&mut self) {
        self.tracker.clean();
    }
}
