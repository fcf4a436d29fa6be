//! Invocation parameters shared by `publish` and `validate`

use clap::Args;
use content_publish::auth::{AuthSource, get_credentials};
use content_publish::config::PublishConfig;
use content_publish::types::{Credentials, PublishRequest};
use std::path::PathBuf;
use tracing::debug;

/// Update script used when none is given
pub const DEFAULT_SCRIPT: &str = "true";

/// Commit message used when none is given
pub const DEFAULT_COMMIT_MESSAGE: &str = "Publish content updates";

/// Content path used when none is given
pub const DEFAULT_CONTENT_PATH: &str = "content";

/// Publish request flags
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Remote repository URL (git@host:owner/repo.git or https://host/owner/repo)
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Base branch to target (defaults to CONTENT_PUBLISH_BASE_BRANCH or "main")
    #[arg(long)]
    pub base_branch: Option<String>,

    /// Update script, run after install and build
    #[arg(long, default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// Commit message (its first line becomes the PR title)
    #[arg(short, long, default_value = DEFAULT_COMMIT_MESSAGE)]
    pub message: String,

    /// Repository-relative path whose changes are published
    #[arg(long, default_value = DEFAULT_CONTENT_PATH)]
    pub content_path: String,

    /// Directory to create the scratch workspace in
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Leave the scratch workspace on disk afterwards
    #[arg(long)]
    pub keep_workspace: bool,
}

impl PublishArgs {
    /// Apply flag overrides to the environment configuration
    pub fn apply_to(&self, config: &mut PublishConfig) {
        if self.keep_workspace {
            config.keep_workspace = true;
        }
        if let Some(dir) = &self.scratch_dir {
            config.scratch_root.clone_from(dir);
        }
    }

    /// Build the publish request
    pub fn to_request(&self, config: &PublishConfig, credentials: Credentials) -> PublishRequest {
        PublishRequest {
            base_branch: self
                .base_branch
                .clone()
                .unwrap_or_else(|| config.default_base_branch.clone()),
            script: self.script.clone(),
            commit_message: self.message.clone(),
            content_path: self.content_path.clone(),
            repo_url: self.repo_url.clone().unwrap_or_default(),
            credentials,
            scratch_root: config.scratch_root.clone(),
        }
    }
}

/// Credentials from the environment, or empty ones when incomplete
///
/// Missing values are left for the request validator, which reports them in
/// field order alongside the other required fields.
pub async fn resolve_credentials() -> (Credentials, Option<AuthSource>) {
    match get_credentials().await {
        Ok(auth) => (auth.credentials, Some(auth.source)),
        Err(e) => {
            debug!("no usable credentials: {e}");
            let username = std::env::var("GIT_USERNAME").unwrap_or_default();
            (
                Credentials {
                    username,
                    password: String::new(),
                },
                None,
            )
        }
    }
}
