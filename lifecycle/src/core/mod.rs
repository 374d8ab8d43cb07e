//! Core lifecycle state
//!
//! Pure bookkeeping that can be tested without any adaptor or host framework.

pub mod notifier;
pub mod state;

pub use notifier::RunNotifier;
pub use state::{SuiteCleanup, SuiteLifecycleTracker};
