//! Change detection
//!
//! Builds the [`ChangeSet`] for the configured content path from git's
//! three-way status. A path is left out only when the last commit, the
//! working tree and the staging area agree on it.

use crate::error::Result;
use crate::git::GitCli;
use crate::types::{ChangeSet, PathStatus};
use std::path::Path;
use tracing::info;

/// Normalize a content path into a git pathspec
///
/// Leading `./` and `/` and trailing `/` are dropped; the repository root
/// becomes `.`.
pub fn content_pathspec(content_path: &str) -> String {
    let mut path = content_path.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let path = path.trim_start_matches('/').trim_end_matches('/');
    if path.is_empty() {
        ".".to_string()
    } else {
        path.to_string()
    }
}

/// Whether a repository-relative path lies under the pathspec
pub fn is_within(path: &str, pathspec: &str) -> bool {
    pathspec == "."
        || path == pathspec
        || path
            .strip_prefix(pathspec)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Compute the change set under `content_path`
pub async fn detect_changes(git: &GitCli, repo: &Path, content_path: &str) -> Result<ChangeSet> {
    let pathspec = content_pathspec(content_path);
    let statuses = git.status(repo, &pathspec).await?;
    let changes = scope_changes(statuses, &pathspec);

    info!(count = changes.len(), path = %pathspec, "detected changes");
    Ok(changes)
}

/// Drop anything outside the pathspec, then apply the unmodified-iff-all-agree rule
pub fn scope_changes(statuses: Vec<PathStatus>, pathspec: &str) -> ChangeSet {
    ChangeSet::from_statuses(
        statuses
            .into_iter()
            .filter(|s| is_within(&s.path, pathspec)),
    )
}
