//! Service-specific tests
//!
//! These run real shell commands, so they exercise the same code paths as the
//! suite runner binary.


pub mod common {
    use std::path::Path;

    /// Read the hook log written by test commands, one entry per line
    pub fn read_log(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
