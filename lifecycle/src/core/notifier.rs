//! Run notification sink shared by every runner of a suite

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, warn};

use shared::{Description, Failure, RunSummary, SuiteId, TestOutcome, TestStatus};

use crate::error::{LifecycleError, LifecycleResult};
use crate::traits::RunListener;

#[derive(Default)]
struct Outcomes {
    entries: Vec<TestOutcome>,
    index: HashMap<Description, usize>,
}

impl Outcomes {
    fn entry(&mut self, description: &Description, status: TestStatus) -> &mut TestOutcome {
        let position = match self.index.get(description) {
            Some(&position) => position,
            None => {
                self.entries.push(TestOutcome {
                    description: description.clone(),
                    status,
                    failures: Vec::new(),
                });
                self.index.insert(description.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position]
    }
}

/// Collects test events from runners and fans out the end-of-run notification
pub struct RunNotifier {
    suite_id: SuiteId,
    outcomes: Mutex<Outcomes>,
    listeners: Mutex<Vec<Arc<dyn RunListener>>>,
    finished: AtomicBool,
    started_at: Instant,
}

impl RunNotifier {
    pub fn new() -> Self {
        Self {
            suite_id: SuiteId::new(),
            outcomes: Mutex::new(Outcomes::default()),
            listeners: Mutex::new(Vec::new()),
            finished: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    fn outcomes(&self) -> MutexGuard<'_, Outcomes> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn RunListener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn suite_id(&self) -> &SuiteId {
        &self.suite_id
    }

    pub fn add_listener(&self, listener: Arc<dyn RunListener>) {
        self.listeners().push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    pub fn fire_test_started(&self, description: &Description) {
        debug!("▶️ {}", description);
        self.outcomes().entry(description, TestStatus::Passed);
    }

    pub fn fire_test_failure(&self, failure: Failure) {
        debug!("❌ {}", failure);
        let mut outcomes = self.outcomes();
        let outcome = outcomes.entry(&failure.description, TestStatus::Failed);
        outcome.status = TestStatus::Failed;
        outcome.failures.push(failure);
    }

    pub fn fire_test_ignored(&self, description: &Description) {
        debug!("⏭️ {}", description);
        self.outcomes().entry(description, TestStatus::Ignored);
    }

    pub fn fire_test_finished(&self, description: &Description) {
        debug!("⏹️ {}", description);
        self.outcomes().entry(description, TestStatus::Passed);
    }

    /// Every failure reported so far, in reporting order
    pub fn failures(&self) -> Vec<Failure> {
        self.outcomes()
            .entries
            .iter()
            .flat_map(|o| o.failures.iter().cloned())
            .collect()
    }

    pub fn outcome(&self, description: &Description) -> Option<TestOutcome> {
        let outcomes = self.outcomes();
        outcomes
            .index
            .get(description)
            .map(|&position| outcomes.entries[position].clone())
    }

    pub fn summary(&self) -> RunSummary {
        let entries = self.outcomes().entries.clone();
        let elapsed_ms = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        RunSummary::from_outcomes(self.suite_id.clone(), entries, elapsed_ms)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Tell every listener the run is over
    ///
    /// Listeners are called in registration order. A failing listener does not
    /// stop the others; the first error is returned once all of them ran.
    pub async fn fire_test_run_finished(&self) -> LifecycleResult<()> {
        if self.finished.swap(true, Ordering::SeqCst) {
            return Err(LifecycleError::RunAlreadyFinished);
        }

        let summary = self.summary();
        let listeners: Vec<Arc<dyn RunListener>> = self.listeners().clone();
        debug!("🏁 Run finished, notifying {} listeners", listeners.len());

        let mut first_error = None;
        for listener in listeners {
            if let Err(error) = listener.test_run_finished(&summary).await {
                warn!("⚠️ Run listener failed: {}", error);
                first_error.get_or_insert(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for RunNotifier {
    fn default() -> Self {
        Self::new()
    }
}
