//! Build executor
//!
//! The update script is an opaque capability: it runs in the workspace and
//! either succeeds or reports an exit code plus captured stderr. It performs
//! no git operations of its own as far as the pipeline is concerned.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Why an update script failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

/// Something that mutates files inside a workspace
#[async_trait]
pub trait UpdateScript: Send + Sync {
    /// Run with `workdir` as the working directory
    async fn execute(&self, workdir: &Path) -> std::result::Result<(), ScriptFailure>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Shell command run through `sh -c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellScript {
    command: String,
}

impl ShellScript {
    /// Run `command` as-is
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Chain optional install and build steps in front of the caller's script
    ///
    /// Produces `install && build && script`, skipping absent steps.
    pub fn with_steps(install: Option<&str>, build: Option<&str>, script: &str) -> Self {
        let command = [install, build, Some(script)]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .collect::<Vec<_>>()
            .join(" && ");
        Self { command }
    }

    /// Full command line
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl UpdateScript for ShellScript {
    async fn execute(&self, workdir: &Path) -> std::result::Result<(), ScriptFailure> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ScriptFailure {
                exit_code: None,
                stderr: format!("failed to start `sh`: {e}"),
            })?;

        debug!(
            "update script output:\n{}",
            String::from_utf8_lossy(&output.stdout)
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(ScriptFailure {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    fn describe(&self) -> String {
        self.command.clone()
    }
}

/// Run the update script, mapping failure to [`Error::BuildScript`]
pub async fn run_update_script(script: &dyn UpdateScript, workdir: &Path) -> Result<()> {
    info!(cwd = %workdir.display(), "running: {}", script.describe());
    script
        .execute(workdir)
        .await
        .map_err(|failure| Error::BuildScript {
            exit_code: failure.exit_code,
            stderr: failure.stderr,
        })
}
