//! Service implementations
//!
//! Real implementations of the adaptor and runner traits. Both execute shell
//! commands, which keeps the suite runner independent of any particular
//! container or test tool.

pub mod command_adaptor;
pub mod command_runner;
pub mod shell;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use command_adaptor::{CommandAdaptor, CommandAdaptorBuilder, SuiteCommands};
pub use command_runner::{CommandRunner, CommandRunnerFactory};
pub use shell::{run_shell, ShellOutput};
