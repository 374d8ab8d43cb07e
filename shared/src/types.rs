//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Global counter for runner numbering
static RUNNER_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Identifier for one runner instance within a process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunnerId(u32);

impl RunnerId {
    /// Allocate the next user-friendly runner number, starting at 1
    pub fn next() -> Self {
        Self(RUNNER_COUNTER.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn from_number(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// Reset runner counter (useful for testing)
    pub fn reset_counter() {
        RUNNER_COUNTER.store(0, Ordering::SeqCst);
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runner_{}", self.0)
    }
}

/// Unique identifier for one suite invocation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuiteId(Uuid);

impl SuiteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SuiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Describes either a whole test class or a single test inside it
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Description {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
}

impl Description {
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            test_name: None,
        }
    }

    pub fn test(class_name: impl Into<String>, test_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            test_name: Some(test_name.into()),
        }
    }

    /// True when this describes a class rather than a single test
    pub fn is_class(&self) -> bool {
        self.test_name.is_none()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test_name {
            Some(test) => write!(f, "{}::{}", self.class_name, test),
            None => write!(f, "{}", self.class_name),
        }
    }
}

/// A failure reported against a class or test
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub description: Description,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl Failure {
    pub fn new(description: Description, message: impl Into<String>) -> Self {
        Self {
            description,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}

/// Final status of a single reported entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Ignored,
}

/// Everything reported for one description during a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub description: Description,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

/// Aggregated result of a suite run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub suite_id: SuiteId,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<TestOutcome>,
    /// Set when suite teardown raised after the tests completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
}

impl RunSummary {
    pub fn from_outcomes(suite_id: SuiteId, outcomes: Vec<TestOutcome>, elapsed_ms: u64) -> Self {
        let count = |status: TestStatus| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            suite_id,
            total: outcomes.len(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            ignored: count(TestStatus::Ignored),
            elapsed_ms,
            finished_at: Utc::now(),
            outcomes,
            teardown_error: None,
        }
    }

    pub fn was_successful(&self) -> bool {
        self.failed == 0 && self.teardown_error.is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.outcomes.iter().flat_map(|o| o.failures.iter())
    }

    pub fn to_json(&self) -> SharedResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SharedError::SerializationError {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(test: &str, status: TestStatus) -> TestOutcome {
        TestOutcome {
            description: Description::test("Spec", test),
            status,
            failures: vec![],
        }
    }

    #[test]
    fn test_runner_id_display() {
        assert_eq!(RunnerId::from_number(3).to_string(), "runner_3");
        assert!(RunnerId::next().number() >= 1);
    }

    #[test]
    fn test_description_display() {
        assert_eq!(Description::class("LoginSpec").to_string(), "LoginSpec");
        assert_eq!(
            Description::test("LoginSpec", "rejects empty password").to_string(),
            "LoginSpec::rejects empty password"
        );
        assert!(Description::class("LoginSpec").is_class());
        assert!(!Description::test("LoginSpec", "a").is_class());
    }

    #[test]
    fn test_failure_display_includes_cause() {
        let failure = Failure::new(Description::class("A"), "setup failed").with_cause("boom");
        assert_eq!(failure.to_string(), "A: setup failed (caused by: boom)");
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::from_outcomes(
            SuiteId::new(),
            vec![
                outcome("a", TestStatus::Passed),
                outcome("b", TestStatus::Failed),
                outcome("c", TestStatus::Ignored),
                outcome("d", TestStatus::Passed),
            ],
            12,
        );

        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.ignored, 1);
        assert!(!summary.was_successful());
    }

    #[test]
    fn test_summary_json_skips_empty_fields() {
        let summary =
            RunSummary::from_outcomes(SuiteId::new(), vec![outcome("a", TestStatus::Passed)], 1);
        let json = summary.to_json().unwrap();

        assert!(json.contains("\"status\": \"passed\""));
        assert!(!json.contains("teardown_error"));
        assert!(!json.contains("failures"));
        assert!(summary.was_successful());
    }
}
