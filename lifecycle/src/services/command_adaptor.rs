//! Suite adaptor backed by shell commands
//!
//! Each suite hook maps to an optional command. A missing command makes the hook
//! a no-op; a command exiting non-zero fails the hook with its stderr attached.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::AdaptorError;
use crate::services::shell::run_shell;
use crate::traits::{AdaptorBuilder, SuiteAdaptor, SuiteHook};

/// Shell commands for the suite hooks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteCommands {
    pub before_suite: Option<String>,
    pub after_suite: Option<String>,
    pub shutdown: Option<String>,
}

impl SuiteCommands {
    fn command(&self, hook: SuiteHook) -> Option<&str> {
        match hook {
            SuiteHook::BeforeSuite => self.before_suite.as_deref(),
            SuiteHook::AfterSuite => self.after_suite.as_deref(),
            SuiteHook::Shutdown => self.shutdown.as_deref(),
        }
    }
}

pub struct CommandAdaptor {
    commands: SuiteCommands,
    working_dir: Option<PathBuf>,
}

impl CommandAdaptor {
    pub fn new(commands: SuiteCommands, working_dir: Option<PathBuf>) -> Self {
        Self {
            commands,
            working_dir,
        }
    }

    async fn run_hook(&self, hook: SuiteHook) -> Result<(), AdaptorError> {
        let Some(command) = self.commands.command(hook) else {
            debug!("⏭️ No command configured for {}", hook);
            return Ok(());
        };

        info!("🔧 Running {}: {}", hook, command);
        let output = run_shell(command, self.working_dir.as_deref())
            .await
            .map_err(|source| AdaptorError::HookSpawn { hook, source })?;

        if output.exited_with(0) {
            debug!("✅ {} completed", hook);
            Ok(())
        } else {
            Err(AdaptorError::HookFailed {
                hook,
                reason: output.describe(),
            })
        }
    }
}

#[async_trait::async_trait]
impl SuiteAdaptor for CommandAdaptor {
    async fn before_suite(&self) -> Result<(), AdaptorError> {
        self.run_hook(SuiteHook::BeforeSuite).await
    }

    async fn after_suite(&self) -> Result<(), AdaptorError> {
        self.run_hook(SuiteHook::AfterSuite).await
    }

    async fn shutdown(&self) -> Result<(), AdaptorError> {
        self.run_hook(SuiteHook::Shutdown).await
    }
}

/// Builds [`CommandAdaptor`]s after checking the configuration is usable
pub struct CommandAdaptorBuilder {
    commands: SuiteCommands,
    working_dir: Option<PathBuf>,
}

impl CommandAdaptorBuilder {
    pub fn new(commands: SuiteCommands) -> Self {
        Self {
            commands,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }
}

#[async_trait::async_trait]
impl AdaptorBuilder for CommandAdaptorBuilder {
    async fn build(&self) -> Result<Box<dyn SuiteAdaptor>, AdaptorError> {
        for hook in [SuiteHook::BeforeSuite, SuiteHook::AfterSuite, SuiteHook::Shutdown] {
            if self.commands.command(hook).is_some_and(|c| c.trim().is_empty()) {
                return Err(AdaptorError::BuildFailed {
                    reason: format!("{hook} command is empty"),
                });
            }
        }

        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(AdaptorError::BuildFailed {
                    reason: format!("working directory {} does not exist", dir.display()),
                });
            }
        }

        Ok(Box::new(CommandAdaptor::new(
            self.commands.clone(),
            self.working_dir.clone(),
        )))
    }
}
