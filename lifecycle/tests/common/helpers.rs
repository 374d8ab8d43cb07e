//! Test helpers for building mocks and checking tracker state

use std::path::Path;
use std::sync::Arc;

use lifecycle::*;
use shared::Description;

use super::fixtures::TestFixtures;

pub struct TestHelpers;

impl TestHelpers {
    /// Adaptor expecting each hook exactly the given number of times, all succeeding
    pub fn adaptor(before: usize, after: usize, shutdown: usize) -> MockSuiteAdaptor {
        let mut adaptor = MockSuiteAdaptor::new();
        adaptor.expect_before_suite().times(before).returning(|| Ok(()));
        adaptor.expect_after_suite().times(after).returning(|| Ok(()));
        adaptor.expect_shutdown().times(shutdown).returning(|| Ok(()));
        adaptor
    }

    /// Builder handing out `adaptor` exactly once
    pub fn builder_with(adaptor: MockSuiteAdaptor) -> Arc<dyn AdaptorBuilder> {
        let mut builder = MockAdaptorBuilder::new();
        builder
            .expect_build()
            .times(1)
            .return_once(move || Ok(Box::new(adaptor) as Box<dyn SuiteAdaptor>));
        Arc::new(builder)
    }

    /// Builder that fails exactly once
    pub fn failing_builder() -> Arc<dyn AdaptorBuilder> {
        let mut builder = MockAdaptorBuilder::new();
        builder
            .expect_build()
            .times(1)
            .returning(|| Err(TestFixtures::build_failure()));
        Arc::new(builder)
    }

    /// Mock class runner with the standard tests, expected to run `runs` times
    pub fn runner(class: &str, runs: usize) -> Box<dyn TestRunner> {
        Self::runner_with_tests(class, TestFixtures::TESTS, runs)
    }

    /// Mock class runner that passes every test it runs
    pub fn runner_with_tests(class: &str, tests: &[&str], runs: usize) -> Box<dyn TestRunner> {
        let children: Vec<Description> = tests
            .iter()
            .map(|test| Description::test(class, *test))
            .collect();
        let executed = children.clone();

        let mut runner = MockTestRunner::new();
        runner
            .expect_description()
            .return_const(Description::class(class));
        runner.expect_children().return_const(children);
        runner.expect_run().times(runs).returning(move |notifier| {
            for description in &executed {
                notifier.fire_test_started(description);
                notifier.fire_test_finished(description);
            }
        });
        Box::new(runner)
    }

    /// Wrap a mock runner into a suite-aware runner sharing `tracker`
    pub fn suite_runner(
        inner: Box<dyn TestRunner>,
        tracker: &Arc<SuiteLifecycleTracker>,
        builder: &Arc<dyn AdaptorBuilder>,
    ) -> SuiteAwareRunner {
        SuiteAwareRunner::new(inner, Arc::clone(tracker), Arc::clone(builder))
    }

    /// Assert the tracker is back to the state of a fresh process
    pub fn assert_clean(tracker: &SuiteLifecycleTracker) {
        assert_eq!(tracker.runner_count(), 0, "No runner should be active");
        assert!(!tracker.has_test_adaptor(), "Adaptor should be released");
        assert!(
            !tracker.has_initialization_exception(),
            "Setup failure should be cleared"
        );
    }

    /// Lines of a log file written by shell commands
    pub fn read_log(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Number of log lines equal to `entry`
    pub fn count_entries(path: &Path, entry: &str) -> usize {
        Self::read_log(path).iter().filter(|line| *line == entry).count()
    }
}
