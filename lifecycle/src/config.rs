//! Suite definition files
//!
//! A suite is described in JSON: the shell commands backing the suite hooks and
//! the test classes, each of which becomes one runner.
//!
//! ```json
//! {
//!   "name": "checkout",
//!   "before_suite": "docker compose up -d",
//!   "after_suite": "docker compose down",
//!   "classes": [
//!     { "name": "CartSpec", "tests": [ { "name": "adds item", "command": "./cart add" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{LifecycleError, LifecycleResult};
use crate::services::SuiteCommands;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub name: String,
    #[serde(default)]
    pub before_suite: Option<String>,
    #[serde(default)]
    pub after_suite: Option<String>,
    #[serde(default)]
    pub shutdown: Option<String>,
    /// Directory commands run in; relative paths resolve against the suite file
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    pub classes: Vec<ClassConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: String,
    pub tests: Vec<TestConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    pub name: String,
    pub command: String,
    // expected exit code
    #[serde(default)]
    pub expect_code: i32,
    #[serde(default)]
    pub ignored: bool,
}

impl SuiteConfig {
    /// Parse and validate a suite definition
    pub fn from_json(json: &str) -> LifecycleResult<Self> {
        let config: SuiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a suite file, resolving its working directory against the file location
    pub fn load(path: &Path) -> LifecycleResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&json)?;

        let base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        config.working_dir = Some(match config.working_dir.take() {
            Some(dir) if dir.is_relative() => base_dir.join(dir),
            Some(dir) => dir,
            None => base_dir.to_path_buf(),
        });

        Ok(config)
    }

    pub fn validate(&self) -> LifecycleResult<()> {
        if self.name.trim().is_empty() {
            return Err(LifecycleError::config("suite name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if class.name.trim().is_empty() {
                return Err(LifecycleError::config("class name cannot be empty"));
            }
            if !seen.insert(class.name.as_str()) {
                return Err(LifecycleError::config(format!(
                    "duplicate class name: {}",
                    class.name
                )));
            }
            if class.tests.is_empty() {
                return Err(LifecycleError::config(format!(
                    "class {} has no tests",
                    class.name
                )));
            }
        }

        Ok(())
    }

    /// Keep only the named classes, preserving file order
    pub fn select_classes(&self, names: &[String]) -> LifecycleResult<Vec<ClassConfig>> {
        if names.is_empty() {
            return Ok(self.classes.clone());
        }

        if let Some(unknown) = names
            .iter()
            .find(|name| !self.classes.iter().any(|c| &c.name == *name))
        {
            return Err(LifecycleError::config(format!("unknown class: {unknown}")));
        }

        Ok(self
            .classes
            .iter()
            .filter(|class| names.contains(&class.name))
            .cloned()
            .collect())
    }

    pub fn commands(&self) -> SuiteCommands {
        SuiteCommands {
            before_suite: self.before_suite.clone(),
            after_suite: self.after_suite.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"{
        "name": "checkout",
        "before_suite": "echo up",
        "classes": [
            { "name": "CartSpec", "tests": [
                { "name": "adds item", "command": "true" },
                { "name": "rejects bad sku", "command": "exit 2", "expect_code": 2 }
            ] },
            { "name": "PaymentSpec", "tests": [
                { "name": "charges card", "command": "true", "ignored": true }
            ] }
        ]
    }"#;

    #[test]
    fn test_parse_suite_with_defaults() {
        let config = SuiteConfig::from_json(SUITE).unwrap();

        assert_eq!(config.name, "checkout");
        assert_eq!(config.classes.len(), 2);
        assert_eq!(config.classes[0].tests[0].expect_code, 0);
        assert_eq!(config.classes[0].tests[1].expect_code, 2);
        assert!(config.classes[1].tests[0].ignored);

        let commands = config.commands();
        assert_eq!(commands.before_suite.as_deref(), Some("echo up"));
        assert!(commands.after_suite.is_none());
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let json = r#"{ "name": "s", "classes": [
            { "name": "A", "tests": [ { "name": "t", "command": "true" } ] },
            { "name": "A", "tests": [ { "name": "t", "command": "true" } ] }
        ] }"#;

        match SuiteConfig::from_json(json) {
            Err(LifecycleError::ConfigurationError { field }) => {
                assert!(field.contains("duplicate class name: A"))
            }
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_class_rejected() {
        let json = r#"{ "name": "s", "classes": [ { "name": "A", "tests": [] } ] }"#;
        assert!(matches!(
            SuiteConfig::from_json(json),
            Err(LifecycleError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            SuiteConfig::from_json("{ not json"),
            Err(LifecycleError::JsonError(_))
        ));
    }

    #[test]
    fn test_select_classes() {
        let config = SuiteConfig::from_json(SUITE).unwrap();

        let all = config.select_classes(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let one = config.select_classes(&["PaymentSpec".to_string()]).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "PaymentSpec");

        assert!(config.select_classes(&["Missing".to_string()]).is_err());
    }

    #[test]
    fn test_load_resolves_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.json");
        std::fs::write(&path, SUITE).unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config.working_dir.as_deref(), Some(dir.path()));

        let nested = SUITE.replacen(
            "\"name\": \"checkout\",",
            "\"name\": \"checkout\", \"working_dir\": \"fixtures\",",
            1,
        );
        std::fs::write(&path, nested).unwrap();
        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config.working_dir, Some(dir.path().join("fixtures")));
    }
}
