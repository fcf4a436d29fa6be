//! Repository identity from remote URLs

use crate::error::{Error, Result};
use crate::types::RepoIdentity;
use regex::Regex;
use std::sync::LazyLock;

// SSH format: git@host:owner/repo.git
static RE_SSH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\w.-]+@)?([\w.-]+):([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
        .expect("hardcoded SSH pattern is valid")
});

// HTTPS format: https://host/owner/repo[.git]
static RE_HTTPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:[^@/\s]+@)?([\w.-]+(?::\d+)?)/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
        .expect("hardcoded HTTPS pattern is valid")
});

/// Resolve a remote URL into owner/repo and a canonical HTTPS clone URL
///
/// Accepts `git@host:owner/repo.git` and `https://host/owner/repo[.git]`.
/// Anything else is rejected with [`Error::InvalidRepoUrl`]. Userinfo in an
/// HTTPS URL is dropped; credentials are supplied separately.
pub fn resolve_repo_identity(url: &str) -> Result<RepoIdentity> {
    let url = url.trim();

    let caps = RE_SSH
        .captures(url)
        .or_else(|| RE_HTTPS.captures(url))
        .ok_or_else(|| Error::InvalidRepoUrl(url.to_string()))?;

    let host = caps[1].to_string();
    let owner = caps[2].to_string();
    let repo = caps[3].to_string();

    if repo.is_empty() || owner == "." || owner == ".." || repo == "." || repo == ".." {
        return Err(Error::InvalidRepoUrl(url.to_string()));
    }

    let clone_url = format!("https://{host}/{owner}/{repo}.git");

    Ok(RepoIdentity {
        host,
        owner,
        repo,
        clone_url,
    })
}

/// Hosting API base URL for a repository host
///
/// `None` means the public github.com API.
pub fn api_base_url(identity: &RepoIdentity) -> Option<String> {
    if identity.host == "github.com" {
        None
    } else {
        Some(format!("https://{}/api/v3", identity.host))
    }
}
