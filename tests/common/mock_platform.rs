//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use content_publish::error::{Error, Result};
use content_publish::platform::PlatformService;
use content_publish::types::{MergeResult, NewPullRequest, PullRequest, RepoIdentity};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub number: u64,
    pub commit_title: String,
    pub commit_message: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    identity: RepoIdentity,
    next_pr_number: AtomicU64,
    // Call tracking
    create_pr_calls: Mutex<Vec<NewPullRequest>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    // Error injection
    error_on_create_pr: Mutex<Option<Error>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock for the given repository
    pub fn new(identity: RepoIdentity) -> Self {
        Self {
            identity,
            next_pr_number: AtomicU64::new(1),
            create_pr_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_merge: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `create_pr` behave like a response without a PR number
    pub fn omit_pr_number(&self) {
        *self.error_on_create_pr.lock().unwrap() =
            Some(Error::PrCreation("missing PR number".to_string()));
    }

    /// Make `create_pr` fail with an API error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(Error::GitHubApi(msg.to_string()));
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<NewPullRequest> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Assert that no PR API call was made
    pub fn assert_untouched(&self) {
        let creates = self.get_create_pr_calls();
        let merges = self.get_merge_calls();
        assert!(
            creates.is_empty() && merges.is_empty(),
            "Expected no PR calls but got creates={creates:?} merges={merges:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_pr(&self, pr: &NewPullRequest) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(pr.clone());

        // Check for injected error
        if let Some(err) = self.error_on_create_pr.lock().unwrap().take() {
            return Err(err);
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.identity.owner, self.identity.repo
            ),
            base_ref: pr.base.clone(),
            head_ref: pr.head.clone(),
            title: pr.title.clone(),
        })
    }

    async fn merge_pr(
        &self,
        number: u64,
        commit_title: &str,
        commit_message: &str,
    ) -> Result<MergeResult> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            number,
            commit_title: commit_title.to_string(),
            commit_message: commit_message.to_string(),
        });

        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::PrMerge(msg.clone()));
        }

        Ok(MergeResult {
            sha: Some(format!("merge{number:036}")),
            message: "Pull Request successfully merged".to_string(),
        })
    }

    fn identity(&self) -> &RepoIdentity {
        &self.identity
    }
}
