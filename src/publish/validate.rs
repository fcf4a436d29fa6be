//! Input validation
//!
//! Runs before anything touches disk or the remote's state. The only side
//! effect is a short-lived directory inside the scratch root.

use crate::error::{Error, Result, ValidationError};
use crate::git::GitCli;
use crate::platform::resolve_repo_identity;
use crate::types::{PublishRequest, RepoIdentity};
use std::path::Path;
use tracing::{debug, info};

/// Validate a publish request
///
/// Checks, in order: required fields, the remote URL shape, that the base
/// branch exists on the remote (one `ls-remote` call), and that the scratch
/// root exists and is writable. Returns the resolved repository identity.
pub async fn validate_request(request: &PublishRequest, git: &GitCli) -> Result<RepoIdentity> {
    check_required_fields(request)?;

    let identity = resolve_repo_identity(&request.repo_url)?;

    let branches = git
        .list_remote_branches(&identity.clone_url)
        .await
        .map_err(|e| ValidationError::RemoteUnreachable {
            url: identity.clone_url.clone(),
            reason: e.to_string(),
        })?;
    debug!(count = branches.len(), "listed remote branches");

    if !branches.iter().any(|b| b == &request.base_branch) {
        return Err(ValidationError::BaseBranchNotFound {
            branch: request.base_branch.clone(),
            url: identity.clone_url,
        }
        .into());
    }

    check_scratch_root(&request.scratch_root).await?;

    info!(
        owner = %identity.owner,
        repo = %identity.repo,
        base = %request.base_branch,
        "request validated"
    );
    Ok(identity)
}

/// Reject requests with empty fields
pub fn check_required_fields(request: &PublishRequest) -> Result<()> {
    let fields = [
        ("base branch", request.base_branch.as_str()),
        ("repository URL", request.repo_url.as_str()),
        ("git username", request.credentials.username.as_str()),
        ("git password", request.credentials.password.as_str()),
        ("update script", request.script.as_str()),
        ("commit message", request.commit_message.as_str()),
        ("content path", request.content_path.as_str()),
    ];

    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(name).into());
        }
    }

    if request.scratch_root.as_os_str().is_empty() {
        return Err(ValidationError::MissingField("scratch directory").into());
    }

    Ok(())
}

/// Confirm the scratch root is an existing directory this process can write to
pub async fn check_scratch_root(root: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|_| ValidationError::ScratchDirMissing(root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(ValidationError::ScratchDirMissing(root.to_path_buf()).into());
    }

    let check = tempfile::Builder::new()
        .prefix(".content-publish-write-check-")
        .tempdir_in(root)
        .map_err(|e| unwritable(root, &e))?;
    check.close().map_err(|e| unwritable(root, &e))?;

    Ok(())
}

fn unwritable(root: &Path, err: &std::io::Error) -> Error {
    ValidationError::ScratchDirUnwritable {
        path: root.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}
