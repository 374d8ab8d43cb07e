//! Test fixtures and data for lifecycle tests

use lifecycle::{AdaptorError, ClassConfig, SuiteHook, TestConfig};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Standard class names
    pub const LOGIN_SPEC: &'static str = "LoginSpec";
    pub const CART_SPEC: &'static str = "CartSpec";
    pub const PAYMENT_SPEC: &'static str = "PaymentSpec";

    /// Standard test names used for every class
    pub const TESTS: &'static [&'static str] = &["accepts valid input", "rejects invalid input"];

    pub fn setup_failure() -> AdaptorError {
        AdaptorError::HookFailed {
            hook: SuiteHook::BeforeSuite,
            reason: "database container did not start".to_string(),
        }
    }

    pub fn build_failure() -> AdaptorError {
        AdaptorError::BuildFailed {
            reason: "no container configuration found".to_string(),
        }
    }

    pub fn teardown_failure(hook: SuiteHook) -> AdaptorError {
        AdaptorError::HookFailed {
            hook,
            reason: "container refused to stop".to_string(),
        }
    }

    /// Class whose tests all run the same shell command
    pub fn class_with_command(name: &str, command: &str) -> ClassConfig {
        ClassConfig {
            name: name.to_string(),
            tests: Self::TESTS
                .iter()
                .map(|test| TestConfig {
                    name: test.to_string(),
                    command: command.to_string(),
                    expect_code: 0,
                    ignored: false,
                })
                .collect(),
        }
    }

    /// Three passing classes that each leave a marker in `classes.log`
    pub fn passing_classes() -> Vec<ClassConfig> {
        [Self::LOGIN_SPEC, Self::CART_SPEC, Self::PAYMENT_SPEC]
            .iter()
            .map(|name| Self::class_with_command(name, &format!("echo {name} >> classes.log")))
            .collect()
    }
}
