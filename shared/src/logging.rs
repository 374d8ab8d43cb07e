//! Shared logging utilities for consistent tracing across the suite runner

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::errors::{SharedError, SharedResult};

/// Log levels accepted on the command line
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Build the per-crate filter directive for a base level
pub fn filter_directive(log_level: Option<&str>) -> SharedResult<String> {
    let base_level = log_level.unwrap_or("info");
    if !LOG_LEVELS.contains(&base_level) {
        return Err(SharedError::InvalidConfig {
            field: "log_level".to_string(),
            value: base_level.to_string(),
        });
    }

    Ok(format!(
        "lifecycle={base_level},suite_runner={base_level},shared={base_level}"
    ))
}

/// Initialize tracing subscriber with an optional log level
///
/// A subscriber that is already installed (for instance by a test harness) is left in place.
pub fn init_tracing_with_level(log_level: Option<&str>) -> SharedResult<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = filter_directive(log_level)?;

    let _ = fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    Ok(())
}

/// Initialize tracing subscriber at the default level
pub fn init_tracing() -> SharedResult<()> {
    init_tracing_with_level(None)
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for runner-aware info logging
#[macro_export]
macro_rules! suite_info {
    ($runner:expr, $($arg:tt)*) => {
        tracing::info!(
            runner = %$runner,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for runner-aware warning logging
#[macro_export]
macro_rules! suite_warn {
    ($runner:expr, $($arg:tt)*) => {
        tracing::warn!(
            runner = %$runner,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for runner-aware error logging
#[macro_export]
macro_rules! suite_error {
    ($runner:expr, $($arg:tt)*) => {
        tracing::error!(
            runner = %$runner,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for runner-aware debug logging
#[macro_export]
macro_rules! suite_debug {
    ($runner:expr, $($arg:tt)*) => {
        tracing::debug!(
            runner = %$runner,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: &str, details: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(component: &str, reason: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: &str, context: &str, error: &dyn std::fmt::Display) {
    error!(
        component = component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(component: &str, message: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
