//! Host framework bridge
//!
//! Plays the part of the host test framework: it creates one suite-aware runner
//! per class, runs them, and fires the end-of-run notification once all of them
//! completed. Teardown errors raised by that notification are handed back to the
//! caller alongside the run summary.

use std::sync::Arc;
use futures_util::future::join_all;
use tracing::{debug, error, info};

use shared::{Description, Failure, RunSummary};

use crate::config::ClassConfig;
use crate::core::{RunNotifier, SuiteLifecycleTracker};
use crate::error::{error_chain, LifecycleResult};
use crate::runner::SuiteAwareRunner;
use crate::traits::{AdaptorBuilder, RunnerFactory, TestRunner};

/// How the runners of a suite are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Result of running a suite
#[derive(Debug)]
pub struct SuiteRun {
    pub summary: RunSummary,
    /// Outcome of the end-of-run notification, i.e. of suite teardown
    pub teardown: LifecycleResult<()>,
}

impl SuiteRun {
    pub fn was_successful(&self) -> bool {
        self.summary.was_successful() && self.teardown.is_ok()
    }
}

pub struct SuiteHost<F>
where
    F: RunnerFactory,
{
    tracker: Arc<SuiteLifecycleTracker>,
    builder: Arc<dyn AdaptorBuilder>,
    factory: F,
}

impl<F> SuiteHost<F>
where
    F: RunnerFactory,
{
    /// Create a host with a fresh tracker
    pub fn new(factory: F, builder: Arc<dyn AdaptorBuilder>) -> Self {
        Self::with_tracker(factory, builder, Arc::new(SuiteLifecycleTracker::new()))
    }

    /// Create a host sharing an existing tracker
    pub fn with_tracker(
        factory: F,
        builder: Arc<dyn AdaptorBuilder>,
        tracker: Arc<SuiteLifecycleTracker>,
    ) -> Self {
        Self {
            tracker,
            builder,
            factory,
        }
    }

    pub fn tracker(&self) -> &Arc<SuiteLifecycleTracker> {
        &self.tracker
    }

    /// Create one runner per class
    ///
    /// A class whose runner cannot be created is reported as failed and left
    /// out, so it never counts as an active runner.
    fn create_runners(
        &self,
        classes: &[ClassConfig],
        notifier: &RunNotifier,
    ) -> Vec<SuiteAwareRunner> {
        classes
            .iter()
            .filter_map(|class| match self.factory.create(class) {
                Ok(inner) => Some(SuiteAwareRunner::new(
                    inner,
                    Arc::clone(&self.tracker),
                    Arc::clone(&self.builder),
                )),
                Err(e) => {
                    error!("❌ Could not create runner for {}: {}", class.name, e);
                    notifier.fire_test_failure(
                        Failure::new(Description::class(&class.name), "Runner could not be created")
                            .with_cause(e),
                    );
                    None
                }
            })
            .collect()
    }

    /// Run every class and tear the suite down afterwards
    pub async fn run(&self, classes: &[ClassConfig], mode: ExecutionMode) -> SuiteRun {
        let notifier = RunNotifier::new();
        let runners = self.create_runners(classes, &notifier);
        info!("📋 Running {} classes ({:?})", runners.len(), mode);

        match mode {
            ExecutionMode::Sequential => {
                for runner in &runners {
                    runner.run(&notifier).await;
                }
            }
            ExecutionMode::Parallel => {
                join_all(runners.iter().map(|runner| runner.run(&notifier))).await;
            }
        }

        let teardown = notifier.fire_test_run_finished().await;
        let mut summary = notifier.summary();
        if let Err(e) = &teardown {
            summary.teardown_error = Some(error_chain(e));
        }

        debug!(
            "Suite {} finished: {} passed, {} failed, {} ignored",
            summary.suite_id, summary.passed, summary.failed, summary.ignored
        );
        SuiteRun { summary, teardown }
    }
}
