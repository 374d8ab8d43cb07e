//! Shell command execution shared by adaptor hooks and test commands

use std::path::Path;
use tokio::process::Command;

/// Captured result of one shell command
#[derive(Debug, Clone)]
pub struct ShellOutput {
    /// Exit code, or `None` when the command was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn exited_with(&self, expected: i32) -> bool {
        self.code == Some(expected)
    }

    /// Short human readable description of how the command ended
    pub fn describe(&self) -> String {
        let mut description = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            description.push_str(": ");
            description.push_str(stderr);
        }
        description
    }
}

/// Run `command` through `sh -c`, inheriting the process environment
pub async fn run_shell(command: &str, working_dir: Option<&Path>) -> std::io::Result<ShellOutput> {
    let mut shell = Command::new("sh");
    shell.args(["-c", command]).kill_on_drop(true);
    if let Some(dir) = working_dir {
        shell.current_dir(dir);
    }

    let output = shell.output().await?;

    Ok(ShellOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
