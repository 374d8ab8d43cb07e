//! Trait definitions with mockall annotations for testing
//!
//! These are the seams between the lifecycle coordination and the outside world:
//! the suite adaptor and its builder on one side, the host framework's runner and
//! listener extension points on the other.

use std::fmt;

use shared::{Description, RunSummary};

use crate::config::ClassConfig;
use crate::core::RunNotifier;
use crate::error::{AdaptorError, LifecycleResult};

/// Suite-level hooks exposed by an adaptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuiteHook {
    BeforeSuite,
    AfterSuite,
    Shutdown,
}

impl fmt::Display for SuiteHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteHook::BeforeSuite => write!(f, "before-suite"),
            SuiteHook::AfterSuite => write!(f, "after-suite"),
            SuiteHook::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// External collaborator providing suite-level setup and teardown
///
/// Once started, an adaptor is owned by the lifecycle tracker and only borrowed
/// by runners for the duration of a call.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SuiteAdaptor: Send + Sync {
    /// Start everything the suite depends on
    async fn before_suite(&self) -> Result<(), AdaptorError>;

    /// Undo what `before_suite` did
    async fn after_suite(&self) -> Result<(), AdaptorError>;

    /// Release the adaptor's own resources
    async fn shutdown(&self) -> Result<(), AdaptorError>;
}

/// Factory for suite adaptors
#[mockall::automock]
#[async_trait::async_trait]
pub trait AdaptorBuilder: Send + Sync {
    /// Build a fresh, not yet started adaptor
    async fn build(&self) -> Result<Box<dyn SuiteAdaptor>, AdaptorError>;
}

/// Host framework runner for the tests of a single class
#[mockall::automock]
#[async_trait::async_trait]
pub trait TestRunner: Send + Sync {
    /// Description of the class this runner executes
    fn description(&self) -> Description;

    /// Descriptions of the individual tests in the class
    fn children(&self) -> Vec<Description>;

    /// Execute the tests, reporting progress through the notifier
    async fn run(&self, notifier: &RunNotifier);
}

/// Creates a host runner from a class descriptor
#[mockall::automock]
pub trait RunnerFactory: Send + Sync {
    fn create(&self, class: &ClassConfig) -> LifecycleResult<Box<dyn TestRunner>>;
}

/// Receives the end-of-run notification
#[mockall::automock]
#[async_trait::async_trait]
pub trait RunListener: Send + Sync {
    /// Called once when every runner of the run has completed
    ///
    /// # Returns
    /// An error that is handed back to whoever fired the notification
    async fn test_run_finished(&self, summary: &RunSummary) -> LifecycleResult<()>;
}
