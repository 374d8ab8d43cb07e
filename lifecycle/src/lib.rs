//! Suite lifecycle library for coordinating suite-level setup and teardown
//!
//! A host test framework creates one runner per test class. This library lets
//! those runners share a single suite adaptor: the first runner to execute starts
//! it, the last runner to finish tears it down, and a failed start poisons every
//! runner for the rest of the suite instead of being retried.

pub mod config;
pub mod core;
pub mod error;
pub mod host;
pub mod runner;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use crate::config::{ClassConfig, SuiteConfig, TestConfig};
pub use crate::core::{RunNotifier, SuiteCleanup, SuiteLifecycleTracker};
pub use error::{AdaptorError, LifecycleError, LifecycleResult};
pub use host::{ExecutionMode, SuiteHost, SuiteRun};
pub use runner::{SuiteAwareRunner, SuiteCompletionListener};
pub use traits::{AdaptorBuilder, RunListener, RunnerFactory, SuiteAdaptor, SuiteHook, TestRunner};
pub use traits::{
    MockAdaptorBuilder, MockRunListener, MockRunnerFactory, MockSuiteAdaptor, MockTestRunner,
};
