//! Core types for content-publish

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Prefix of every publish branch name
pub const PUBLISH_BRANCH_PREFIX: &str = "content-publish";

/// Git credentials, reused as the API bearer token
///
/// `Debug` never prints the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Git username
    pub username: String,
    /// Git password or personal access token
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A single publish invocation, as supplied by the caller
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Branch the pull request targets
    pub base_branch: String,
    /// Caller's update script (shell command)
    pub script: String,
    /// Commit message for the content change
    pub commit_message: String,
    /// Repository-relative path the change set is scoped to
    pub content_path: String,
    /// Remote git URL (SSH or HTTPS shape)
    pub repo_url: String,
    /// Git and API credentials
    pub credentials: Credentials,
    /// Directory under which the scratch workspace is created
    pub scratch_root: PathBuf,
}

/// Repository coordinates derived from a remote URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoIdentity {
    /// Git host (e.g. "github.com")
    pub host: String,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name, without `.git`
    pub repo: String,
    /// Canonical HTTPS clone URL
    pub clone_url: String,
}

/// Name of the branch carrying a run's content change
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublishBranch(String);

impl PublishBranch {
    /// Branch name for a run started at `started_at`
    pub fn at(started_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{PUBLISH_BRANCH_PREFIX}-{}-{}",
            started_at.format("%Y%m%d"),
            started_at.timestamp_millis()
        ))
    }

    /// Branch name for a run starting now
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Branch name as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublishBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one side of the three-way comparison, relative to the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Path does not exist on this side
    Absent,
    /// Content identical to the last commit
    Unchanged,
    /// Content differs from the last commit (or the commit lacks the path)
    Changed,
}

/// Three-way status of a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStatus {
    /// Repository-relative path
    pub path: String,
    /// Whether the last commit contains the path
    pub in_head: bool,
    /// Working tree state
    pub workdir: EntryState,
    /// Staging area state
    pub stage: EntryState,
}

impl PathStatus {
    /// Status of a path identical in all three states
    pub fn clean(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            in_head: true,
            workdir: EntryState::Unchanged,
            stage: EntryState::Unchanged,
        }
    }

    /// True iff last commit, working tree and staging area all agree
    pub const fn is_unmodified(&self) -> bool {
        self.in_head
            && matches!(self.workdir, EntryState::Unchanged)
            && matches!(self.stage, EntryState::Unchanged)
    }
}

/// Ordered, de-duplicated list of changed repository-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    /// Build a change set from per-path statuses, dropping unmodified paths
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = PathStatus>,
    {
        let mut paths: Vec<String> = statuses
            .into_iter()
            .filter(|s| !s.is_unmodified())
            .map(|s| s.path)
            .collect();
        paths.sort();
        paths.dedup();
        Self { paths }
    }

    /// Changed paths, sorted
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of changed paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Result of merging a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    /// Merge commit SHA reported by the API
    pub sha: Option<String>,
    /// API message
    pub message: String,
}

/// Everything needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Head (publish) branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
}
