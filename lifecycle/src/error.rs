//! Lifecycle-specific error types

use std::sync::Arc;
use thiserror::Error;
use shared::SharedError;

use crate::traits::SuiteHook;

/// Failures raised by the suite adaptor or its builder
#[derive(Error, Debug)]
pub enum AdaptorError {
    #[error("Failed to build suite adaptor: {reason}")]
    BuildFailed { reason: String },

    #[error("Suite hook {hook} failed: {reason}")]
    HookFailed { hook: SuiteHook, reason: String },

    #[error("Suite hook {hook} could not be started")]
    HookSpawn {
        hook: SuiteHook,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("No suite adaptor has been registered")]
    NoTestAdaptor,

    #[error("No initialization failure has been recorded")]
    NoInitializationFailure,

    #[error("Suite adaptor was previously attempted to be initialized, but failed. See cause for previous failure")]
    PreviousInitializationFailed {
        #[source]
        source: Arc<AdaptorError>,
    },

    #[error("Suite setup failed")]
    Setup {
        #[source]
        source: Arc<AdaptorError>,
    },

    #[error("Could not run after-suite")]
    Teardown {
        #[source]
        source: AdaptorError,
    },

    #[error("Test run has already finished")]
    RunAlreadyFinished,

    #[error("Runner for {class} could not be created: {reason}")]
    Runner { class: String, reason: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LifecycleError {
    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    /// Protocol violations by the caller rather than runtime conditions
    pub fn is_logic_error(&self) -> bool {
        matches!(self, Self::NoTestAdaptor | Self::NoInitializationFailure)
    }
}

/// Render an error and all of its sources as one line
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
