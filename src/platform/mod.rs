//! Hosting platform services
//!
//! Resolves repository identity from remote URLs and wraps the pull request
//! API behind [`PlatformService`].

mod detection;
mod factory;
mod github;

pub use detection::{api_base_url, resolve_repo_identity};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{MergeResult, NewPullRequest, PullRequest, RepoIdentity};
use async_trait::async_trait;

/// Platform service trait for pull request operations
///
/// Implementations map API failures onto [`crate::error::Error::PrCreation`]
/// and [`crate::error::Error::PrMerge`] so the caller can tell which
/// transition failed.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Open a pull request; fails if the response carries no PR number
    async fn create_pr(&self, pr: &NewPullRequest) -> Result<PullRequest>;

    /// Merge an open pull request
    async fn merge_pr(&self, number: u64, commit_title: &str, commit_message: &str)
        -> Result<MergeResult>;

    /// Repository this service talks to
    fn identity(&self) -> &RepoIdentity;
}
