//! Commit and push
//!
//! Stages exactly the change set (never a blanket add), commits it as the
//! configured author and pushes the publish branch.

use crate::error::{Error, Result};
use crate::git::{Author, GitCli};
use crate::types::{ChangeSet, PublishBranch};
use std::path::Path;
use tracing::info;

/// Stage and commit the change set; returns the commit id
///
/// Failures surface as [`Error::Commit`].
pub async fn commit_changes(
    git: &GitCli,
    repo: &Path,
    changes: &ChangeSet,
    message: &str,
    author: &Author,
) -> Result<String> {
    if changes.is_empty() {
        return Err(Error::Commit("nothing to commit".to_string()));
    }

    git.stage(repo, changes.paths())
        .await
        .map_err(|e| Error::Commit(e.to_string()))?;

    let sha = git
        .commit(repo, message, author)
        .await
        .map_err(|e| Error::Commit(e.to_string()))?;

    info!(%sha, files = changes.len(), "committed changes");
    Ok(sha)
}

/// Push the publish branch to the remote
///
/// Failures surface as [`Error::Push`]; the local commit is left in place.
pub async fn push_branch(git: &GitCli, repo: &Path, branch: &PublishBranch) -> Result<()> {
    git.push(repo, branch.as_str())
        .await
        .map_err(|e| Error::Push(e.to_string()))?;

    info!(%branch, "pushed publish branch");
    Ok(())
}
