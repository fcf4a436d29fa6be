//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{MergeResult, NewPullRequest, PullRequest, RepoIdentity};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    identity: RepoIdentity,
}

#[derive(Serialize)]
struct CreatePullPayload<'a> {
    owner: &'a str,
    repo: &'a str,
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Deserialize)]
struct CreatedPull {
    number: Option<u64>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Serialize)]
struct MergePullPayload<'a> {
    commit_title: &'a str,
    commit_message: &'a str,
}

#[derive(Deserialize)]
struct MergedPull {
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    message: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `base_url` overrides the public API endpoint (GitHub Enterprise or a
    /// test server).
    pub fn new(token: &str, identity: RepoIdentity, base_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(base) = base_url {
            builder = builder
                .base_uri(base)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, identity })
    }

    fn pulls_route(&self) -> String {
        format!("/repos/{}/{}/pulls", self.identity.owner, self.identity.repo)
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_pr(&self, pr: &NewPullRequest) -> Result<PullRequest> {
        let payload = CreatePullPayload {
            owner: &self.identity.owner,
            repo: &self.identity.repo,
            title: &pr.title,
            body: &pr.body,
            head: &pr.head,
            base: &pr.base,
        };

        let created: CreatedPull = self
            .client
            .post(self.pulls_route(), Some(&payload))
            .await
            .map_err(|e| Error::PrCreation(describe(&e)))?;

        let number = created
            .number
            .ok_or_else(|| Error::PrCreation("missing PR number".to_string()))?;

        Ok(PullRequest {
            number,
            html_url: created.html_url.unwrap_or_default(),
            base_ref: pr.base.clone(),
            head_ref: pr.head.clone(),
            title: created.title.unwrap_or_else(|| pr.title.clone()),
        })
    }

    async fn merge_pr(
        &self,
        number: u64,
        commit_title: &str,
        commit_message: &str,
    ) -> Result<MergeResult> {
        let payload = MergePullPayload {
            commit_title,
            commit_message,
        };

        let merged: MergedPull = self
            .client
            .put(format!("{}/{number}/merge", self.pulls_route()), Some(&payload))
            .await
            .map_err(|e| Error::PrMerge(describe(&e)))?;

        if !merged.merged {
            return Err(Error::PrMerge(format!(
                "PR #{number} was not merged: {}",
                merged.message
            )));
        }

        Ok(MergeResult {
            sha: merged.sha,
            message: merged.message,
        })
    }

    fn identity(&self) -> &RepoIdentity {
        &self.identity
    }
}

/// Render an octocrab error, keeping the API's message and field errors
fn describe(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let mut msg = source.message.clone();
            if let Some(errors) = source.errors.as_ref().filter(|e| !e.is_empty()) {
                msg.push_str(" (");
                msg.push_str(&serde_json::to_string(errors).unwrap_or_default());
                msg.push(')');
            }
            msg
        }
        other => other.to_string(),
    }
}
