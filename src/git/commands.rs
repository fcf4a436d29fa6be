//! Git command wrappers using [`tokio::process::Command`].
//!
//! Every method shells out to the system `git` binary. Credentials and extra
//! settings are injected through `GIT_CONFIG_COUNT`/`GIT_CONFIG_KEY_n`/
//! `GIT_CONFIG_VALUE_n`, so they never show up in argv, remote URLs, or the
//! clone's `.git/config`.

use crate::error::{Error, Result};
use crate::git::status::parse_porcelain;
use crate::types::{Credentials, PathStatus};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Commit author identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

/// Handle for running git with a fixed set of credentials and settings
#[derive(Clone, Default)]
pub struct GitCli {
    config: Vec<(String, String)>,
}

impl std::fmt::Debug for GitCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may hold an Authorization header
        let keys: Vec<&str> = self.config.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("GitCli").field("config_keys", &keys).finish()
    }
}

impl GitCli {
    /// Git without credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate HTTPS remotes with basic credentials
    #[must_use]
    pub fn with_credentials(self, credentials: &Credentials) -> Self {
        let basic = BASE64.encode(format!("{}:{}", credentials.username, credentials.password));
        self.with_config("http.extraHeader", format!("Authorization: Basic {basic}"))
    }

    /// Apply an extra git setting to every command
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.push((key.into(), value.into()));
        self
    }

    fn command(&self, cwd: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = cwd {
            cmd.arg("-C").arg(dir);
        }

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.env("GIT_CONFIG_COUNT", self.config.len().to_string());
        for (i, (key, value)) in self.config.iter().enumerate() {
            cmd.env(format!("GIT_CONFIG_KEY_{i}"), key);
            cmd.env(format!("GIT_CONFIG_VALUE_{i}"), value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    async fn run<I, S>(
        &self,
        cwd: Option<&Path>,
        subcommand: &str,
        args: I,
        env: &[(&str, &str)],
    ) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command(cwd);
        cmd.arg(subcommand).args(args);
        for (k, v) in env {
            cmd.env(k, v);
        }

        debug!("spawning git {subcommand}");

        let output = cmd.output().await?;

        if !output.status.success() {
            return Err(Error::Git {
                command: subcommand.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Branch names under `refs/heads/` on a remote
    #[instrument(skip(self))]
    pub async fn list_remote_branches(&self, url: &str) -> Result<Vec<String>> {
        let stdout = self.run(None, "ls-remote", ["--heads", url], &[]).await?;
        Ok(parse_ls_remote_heads(&String::from_utf8_lossy(&stdout)))
    }

    /// Shallow (depth 1), single-branch clone of `branch` into `dest`
    #[instrument(skip(self), fields(dest = %dest.display()))]
    pub async fn clone_shallow(&self, url: &str, branch: &str, dest: &Path) -> Result<()> {
        let args: [&OsStr; 9] = [
            "--depth".as_ref(),
            "1".as_ref(),
            "--single-branch".as_ref(),
            "--no-tags".as_ref(),
            "--branch".as_ref(),
            branch.as_ref(),
            "--".as_ref(),
            url.as_ref(),
            dest.as_os_str(),
        ];
        self.run(None, "clone", args, &[]).await?;
        debug!("git clone succeeded");
        Ok(())
    }

    /// Create `branch` from HEAD and check it out
    #[instrument(skip(self), fields(repo = %repo.display()))]
    pub async fn create_branch(&self, repo: &Path, branch: &str) -> Result<()> {
        self.run(Some(repo), "checkout", ["-b", branch], &[]).await?;
        Ok(())
    }

    /// Three-way status of every non-clean path under `pathspec`
    #[instrument(skip(self), fields(repo = %repo.display()))]
    pub async fn status(&self, repo: &Path, pathspec: &str) -> Result<Vec<PathStatus>> {
        let stdout = self
            .run(
                Some(repo),
                "status",
                [
                    "--porcelain=v1",
                    "-z",
                    "--untracked-files=all",
                    "--no-renames",
                    "--",
                    pathspec,
                ],
                &[],
            )
            .await?;
        Ok(parse_porcelain(&stdout))
    }

    /// Stage exactly `paths`, including deletions
    #[instrument(skip(self, paths), fields(repo = %repo.display(), count = paths.len()))]
    pub async fn stage(&self, repo: &Path, paths: &[String]) -> Result<()> {
        let mut args = vec!["--all".to_string(), "--".to_string()];
        args.extend(paths.iter().cloned());
        self.run(Some(repo), "add", args, &[]).await?;
        Ok(())
    }

    /// Commit the staging area as `author`; returns the new commit id
    #[instrument(skip(self, message), fields(repo = %repo.display()))]
    pub async fn commit(&self, repo: &Path, message: &str, author: &Author) -> Result<String> {
        let env = [
            ("GIT_AUTHOR_NAME", author.name.as_str()),
            ("GIT_AUTHOR_EMAIL", author.email.as_str()),
            ("GIT_COMMITTER_NAME", author.name.as_str()),
            ("GIT_COMMITTER_EMAIL", author.email.as_str()),
        ];
        self.run(
            Some(repo),
            "commit",
            ["--no-verify", "--no-gpg-sign", "-m", message],
            &env,
        )
        .await?;

        let sha = self.run(Some(repo), "rev-parse", ["HEAD"], &[]).await?;
        Ok(String::from_utf8_lossy(&sha).trim().to_string())
    }

    /// Push `branch` to `origin` under the same name
    #[instrument(skip(self), fields(repo = %repo.display()))]
    pub async fn push(&self, repo: &Path, branch: &str) -> Result<()> {
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.run(Some(repo), "push", ["origin", refspec.as_str()], &[])
            .await?;
        Ok(())
    }
}

/// Parse `git ls-remote --heads` output into branch names
pub fn parse_ls_remote_heads(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|reference| reference.strip_prefix("refs/heads/"))
        .map(ToString::to_string)
        .collect()
}
