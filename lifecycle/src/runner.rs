//! Suite-aware runner wrapper
//!
//! Wraps the host framework's per-class runner so that suite-level setup and
//! teardown happen exactly once per suite, however many runners the host creates.
//! The first runner to execute builds and starts the adaptor; the last runner to
//! finish tears it down; a failed start poisons the rest of the suite.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::{
    suite_debug, suite_error, suite_info, suite_warn, Description, Failure, RunSummary, RunnerId,
};

use crate::core::{RunNotifier, SuiteLifecycleTracker};
use crate::error::{error_chain, AdaptorError, LifecycleError, LifecycleResult};
use crate::traits::{AdaptorBuilder, RunListener, SuiteAdaptor, TestRunner};

pub struct SuiteAwareRunner {
    id: RunnerId,
    inner: Box<dyn TestRunner>,
    tracker: Arc<SuiteLifecycleTracker>,
    builder: Arc<dyn AdaptorBuilder>,
    ran: AtomicBool,
}

impl SuiteAwareRunner {
    /// Wrap `inner` and register it as an active runner of the suite
    pub fn new(
        inner: Box<dyn TestRunner>,
        tracker: Arc<SuiteLifecycleTracker>,
        builder: Arc<dyn AdaptorBuilder>,
    ) -> Self {
        let id = RunnerId::next();
        let active = tracker.runner_started();
        suite_debug!(id, "Runner created for {} ({} active)", inner.description(), active);

        Self {
            id,
            inner,
            tracker,
            builder,
            ran: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> RunnerId {
        self.id
    }

    /// Make sure the suite adaptor is running, or report why it is not
    async fn ensure_suite_started(&self, notifier: &RunNotifier) {
        let _gate = self.tracker.setup_gate().await;

        if self.tracker.has_test_adaptor() {
            return;
        }

        if let Ok(previous) = self.tracker.initialization_exception() {
            suite_warn!(
                self.id,
                "⚠️ Suite setup failed earlier, not running {}",
                self.inner.description()
            );
            let cause = error_chain(&*previous);
            let error = LifecycleError::PreviousInitializationFailed { source: previous };
            self.report_failure(notifier, &error, &cause);
            return;
        }

        suite_info!(self.id, "🚀 Starting suite adaptor");
        match self.start_adaptor().await {
            Ok(adaptor) => {
                if let Err(error) = self.tracker.set_test_adaptor(Arc::clone(&adaptor)) {
                    suite_error!(self.id, "❌ Suite adaptor rejected: {}", error);
                    self.stop_rejected(&*adaptor).await;
                    let cause = error_chain(&error);
                    self.report_failure(notifier, &error, &cause);
                }
            }
            Err(error) => {
                suite_error!(self.id, "❌ Suite setup failed: {}", error);
                let source = self.tracker.caught_initialization_exception(error);
                let cause = error_chain(&*source);
                self.report_failure(notifier, &LifecycleError::Setup { source }, &cause);
            }
        }
    }

    // The adaptor is only handed to the tracker once before-suite succeeded.
    async fn start_adaptor(&self) -> Result<Arc<dyn SuiteAdaptor>, AdaptorError> {
        let adaptor: Arc<dyn SuiteAdaptor> = Arc::from(self.builder.build().await?);
        adaptor.before_suite().await?;
        Ok(adaptor)
    }

    // Nobody else will tear down an adaptor the tracker refused to store.
    async fn stop_rejected(&self, adaptor: &dyn SuiteAdaptor) {
        if let Err(error) = adaptor.after_suite().await {
            suite_warn!(self.id, "⚠️ After-suite of rejected adaptor failed: {}", error);
        }
        if let Err(error) = adaptor.shutdown().await {
            suite_warn!(self.id, "⚠️ Shutdown of rejected adaptor failed: {}", error);
        }
    }

    /// Fail every test of this runner without running it
    fn report_failure(&self, notifier: &RunNotifier, error: &LifecycleError, cause: &str) {
        let mut targets = self.inner.children();
        if targets.is_empty() {
            targets.push(self.inner.description());
        }

        for description in targets {
            notifier
                .fire_test_failure(Failure::new(description, error.to_string()).with_cause(cause));
        }
    }
}

#[async_trait::async_trait]
impl TestRunner for SuiteAwareRunner {
    fn description(&self) -> Description {
        self.inner.description()
    }

    fn children(&self) -> Vec<Description> {
        self.inner.children()
    }

    async fn run(&self, notifier: &RunNotifier) {
        if self.ran.swap(true, Ordering::SeqCst) {
            suite_warn!(self.id, "⚠️ Runner for {} was already run", self.inner.description());
            return;
        }

        self.ensure_suite_started(notifier).await;

        notifier.add_listener(Arc::new(SuiteCompletionListener::new(
            self.id,
            Arc::clone(&self.tracker),
        )));

        if self.tracker.has_test_adaptor() {
            suite_debug!(self.id, "Running {}", self.inner.description());
            self.inner.run(notifier).await;
        }
    }
}

/// Completion hook registered by every runner
///
/// Deregisters its runner when the run finishes. The listener of the last
/// runner tears the suite down and always leaves the tracker cleaned.
pub struct SuiteCompletionListener {
    runner: RunnerId,
    tracker: Arc<SuiteLifecycleTracker>,
}

impl SuiteCompletionListener {
    pub fn new(runner: RunnerId, tracker: Arc<SuiteLifecycleTracker>) -> Self {
        Self { runner, tracker }
    }

    async fn tear_down(&self) -> LifecycleResult<()> {
        let _cleanup = self.tracker.cleanup_guard();

        let Ok(adaptor) = self.tracker.test_adaptor() else {
            suite_debug!(self.runner, "No suite adaptor to tear down");
            return Ok(());
        };

        adaptor
            .after_suite()
            .await
            .map_err(|source| LifecycleError::Teardown { source })?;
        adaptor
            .shutdown()
            .await
            .map_err(|source| LifecycleError::Teardown { source })?;

        suite_info!(self.runner, "✅ Suite torn down");
        Ok(())
    }
}

#[async_trait::async_trait]
impl RunListener for SuiteCompletionListener {
    async fn test_run_finished(&self, _summary: &RunSummary) -> LifecycleResult<()> {
        if !self.tracker.finish_runner() {
            suite_debug!(
                self.runner,
                "Runner finished, {} still active",
                self.tracker.runner_count()
            );
            return Ok(());
        }

        suite_info!(self.runner, "🏁 Last runner finished, tearing down suite");
        let result = self.tear_down().await;
        if let Err(error) = &result {
            suite_error!(self.runner, "❌ Suite teardown failed: {}", error_chain(error));
        }
        result
    }
}
