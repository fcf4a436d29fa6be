//! Error types for content-publish

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating or running a publish
#[derive(Error, Debug)]
pub enum Error {
    /// Remote URL matched neither the SSH nor the HTTPS shape
    #[error("invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    /// Request rejected before any side effect
    #[error("input validation failed: {0}")]
    InputValidation(#[from] ValidationError),

    /// Shallow clone into the scratch workspace failed
    #[error("clone failed: {0}")]
    Clone(String),

    /// Publish branch could not be created or checked out
    #[error("branch creation failed: {0}")]
    Branch(String),

    /// Update script exited unsuccessfully
    #[error("build script failed ({}): {stderr}", exit_label(.exit_code))]
    BuildScript {
        /// Exit code, if the process exited normally
        exit_code: Option<i32>,
        /// Captured standard error, verbatim
        stderr: String,
    },

    /// Staging or committing the change set failed
    #[error("commit failed: {0}")]
    Commit(String),

    /// Pushing the publish branch failed
    #[error("push failed: {0}")]
    Push(String),

    /// Pull request could not be created
    #[error("pull request creation failed: {0}")]
    PrCreation(String),

    /// Pull request was created but could not be merged
    #[error("pull request merge failed: {0}")]
    PrMerge(String),

    /// A git command exited unsuccessfully
    #[error("`git {command}` exited with {status}: {stderr}")]
    Git {
        /// Git subcommand that failed
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// GitHub API error outside of the PR stages
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Malformed configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a publish request is rejected up front
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required request field was empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The base branch is not among the remote's heads
    #[error("base branch '{branch}' not found on {url}")]
    BaseBranchNotFound {
        /// Requested base branch
        branch: String,
        /// Remote that was queried
        url: String,
    },

    /// Listing the remote's branches failed
    #[error("could not list branches of {url}: {reason}")]
    RemoteUnreachable {
        /// Remote that was queried
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// Scratch root does not exist or is not a directory
    #[error("scratch directory {} does not exist", .0.display())]
    ScratchDirMissing(PathBuf),

    /// Scratch root exists but cannot be written
    #[error("scratch directory {} is not writable: {reason}", .path.display())]
    ScratchDirUnwritable {
        /// Scratch root
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"))
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}
