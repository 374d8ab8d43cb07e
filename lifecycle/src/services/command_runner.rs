//! Host runner executing one class of shell-command tests

use std::path::PathBuf;

use shared::{Description, Failure};

use crate::config::{ClassConfig, TestConfig};
use crate::core::RunNotifier;
use crate::error::LifecycleResult;
use crate::services::shell::run_shell;
use crate::traits::{RunnerFactory, TestRunner};

/// Runs the tests of a class one after another, each as a shell command
pub struct CommandRunner {
    class: ClassConfig,
    working_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(class: ClassConfig, working_dir: Option<PathBuf>) -> Self {
        Self { class, working_dir }
    }

    async fn run_test(&self, test: &TestConfig, notifier: &RunNotifier) {
        let description = Description::test(&self.class.name, &test.name);
        if test.ignored {
            notifier.fire_test_ignored(&description);
            return;
        }

        notifier.fire_test_started(&description);
        match run_shell(&test.command, self.working_dir.as_deref()).await {
            Ok(output) if output.exited_with(test.expect_code) => {}
            Ok(output) => {
                let actual = match output.code {
                    Some(code) => code.to_string(),
                    None => "none".to_string(),
                };
                let mut failure = Failure::new(
                    description.clone(),
                    format!(
                        "Expected return code: {} Actual return code: {}",
                        test.expect_code, actual
                    ),
                );
                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    failure = failure.with_cause(stderr);
                }
                notifier.fire_test_failure(failure);
            }
            Err(error) => {
                notifier.fire_test_failure(
                    Failure::new(description.clone(), "Failed to run test command")
                        .with_cause(error),
                );
            }
        }
        notifier.fire_test_finished(&description);
    }
}

#[async_trait::async_trait]
impl TestRunner for CommandRunner {
    fn description(&self) -> Description {
        Description::class(&self.class.name)
    }

    fn children(&self) -> Vec<Description> {
        self.class
            .tests
            .iter()
            .map(|test| Description::test(&self.class.name, &test.name))
            .collect()
    }

    async fn run(&self, notifier: &RunNotifier) {
        for test in &self.class.tests {
            self.run_test(test, notifier).await;
        }
    }
}

/// Creates a [`CommandRunner`] per class, all sharing one working directory
#[derive(Debug, Clone, Default)]
pub struct CommandRunnerFactory {
    working_dir: Option<PathBuf>,
}

impl CommandRunnerFactory {
    pub fn new(working_dir: Option<PathBuf>) -> Self {
        Self { working_dir }
    }
}

impl RunnerFactory for CommandRunnerFactory {
    fn create(&self, class: &ClassConfig) -> LifecycleResult<Box<dyn TestRunner>> {
        Ok(Box::new(CommandRunner::new(
            class.clone(),
            self.working_dir.clone(),
        )))
    }
}
