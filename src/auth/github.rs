//! Git / GitHub credential lookup

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use crate::types::Credentials;
use std::env;
use tokio::process::Command;

/// Resolved credentials and where the secret came from
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// Username + password/token pair
    pub credentials: Credentials,
    /// Where the password/token was obtained from
    pub source: AuthSource,
}

/// Resolve credentials from the process environment
///
/// Username: `GIT_USERNAME`.
///
/// Password priority:
/// 1. `GIT_PASSWORD` environment variable
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
/// 4. gh CLI (`gh auth token`)
pub async fn get_credentials() -> Result<CredentialsConfig> {
    get_credentials_from(|key| env::var(key).ok()).await
}

/// Resolve credentials from an arbitrary key lookup, falling back to the gh CLI
pub async fn get_credentials_from<F>(lookup: F) -> Result<CredentialsConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let username = lookup("GIT_USERNAME")
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| Error::Auth("GIT_USERNAME is not set".to_string()))?;

    for key in ["GIT_PASSWORD", "GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(password) = lookup(key).filter(|p| !p.trim().is_empty()) {
            return Ok(CredentialsConfig {
                credentials: Credentials { username, password },
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(password) = get_gh_cli_token().await {
        return Ok(CredentialsConfig {
            credentials: Credentials { username, password },
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No git password found. Set GIT_PASSWORD (or GITHUB_TOKEN) or run `gh auth login`"
            .to_string(),
    ))
}

async fn get_gh_cli_token() -> Option<String> {
    // Check authenticated
    let status = Command::new("gh")
        .args(["auth", "status"])
        .output()
        .await
        .ok()?;

    if !status.status.success() {
        return None;
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Check that the token is accepted by the hosting API
///
/// Returns the login the token belongs to.
pub async fn test_credentials(credentials: &Credentials, api_base_url: Option<&str>) -> Result<String> {
    let mut builder =
        octocrab::Octocrab::builder().personal_token(credentials.password.clone());
    if let Some(base) = api_base_url {
        builder = builder
            .base_uri(base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }
    let octocrab = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;

    Ok(user.login)
}
