//! Scratch workspace provisioning
//!
//! A [`Workspace`] owns one freshly named directory holding a shallow clone.
//! The directory is removed when the workspace is dropped, on success and
//! failure alike, unless retention was requested.

use crate::error::{Error, Result};
use crate::git::GitCli;
use crate::types::{PublishBranch, RepoIdentity};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

#[derive(Debug)]
enum Scratch {
    /// Removed when dropped
    Owned(TempDir),
    /// Left on disk
    Kept(PathBuf),
}

/// Exclusively owned scratch directory for one run
#[derive(Debug)]
pub struct Workspace {
    scratch: Scratch,
}

impl Workspace {
    /// Create `{root}/{prefix}{random suffix}`
    pub fn create(root: &Path, prefix: &str, keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .rand_bytes(12)
            .tempdir_in(root)?;

        let scratch = if keep {
            let path = dir.keep();
            info!(path = %path.display(), "workspace will be kept");
            Scratch::Kept(path)
        } else {
            Scratch::Owned(dir)
        };
        Ok(Self { scratch })
    }

    /// Directory holding the clone
    pub fn path(&self) -> &Path {
        match &self.scratch {
            Scratch::Owned(dir) => dir.path(),
            Scratch::Kept(path) => path,
        }
    }

    /// Whether the directory survives the workspace
    pub const fn is_kept(&self) -> bool {
        matches!(self.scratch, Scratch::Kept(_))
    }
}

/// Shallow-clone the base branch into a new workspace
///
/// Clone failures surface as [`Error::Clone`].
pub async fn clone_workspace(
    git: &GitCli,
    identity: &RepoIdentity,
    base_branch: &str,
    root: &Path,
    prefix: &str,
    keep: bool,
) -> Result<Workspace> {
    let workspace = Workspace::create(root, prefix, keep)
        .map_err(|e| Error::Clone(format!("cannot create scratch directory: {e}")))?;

    git.clone_shallow(&identity.clone_url, base_branch, workspace.path())
        .await
        .map_err(|e| Error::Clone(e.to_string()))?;

    info!(path = %workspace.path().display(), "cloned {}", identity.clone_url);
    Ok(workspace)
}

/// Create and check out the publish branch
///
/// Failures surface as [`Error::Branch`].
pub async fn checkout_publish_branch(
    git: &GitCli,
    workspace: &Workspace,
    branch: &PublishBranch,
) -> Result<()> {
    git.create_branch(workspace.path(), branch.as_str())
        .await
        .map_err(|e| Error::Branch(e.to_string()))
}
