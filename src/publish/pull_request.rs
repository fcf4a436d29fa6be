//! Pull request orchestration
//!
//! Two transitions against the hosting API: open the PR, then merge it.
//! Each maps its failure onto its own error variant so the caller can tell
//! whether a PR was left open.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{ChangeSet, MergeResult, NewPullRequest, PublishBranch, PullRequest};
use std::fmt::Write;
use tracing::info;

/// PR for a publish branch: title from the commit subject, body listing files
pub fn build_pull_request(
    branch: &PublishBranch,
    base: &str,
    commit_message: &str,
    changes: &ChangeSet,
) -> NewPullRequest {
    let title = commit_message
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut body = format!("Automated content publish from `{branch}`.\n\nChanged files:\n");
    for path in changes.paths() {
        let _ = writeln!(body, "- `{path}`");
    }

    NewPullRequest {
        head: branch.to_string(),
        base: base.to_string(),
        title,
        body,
    }
}

/// Commit title used when merging
pub fn merge_commit_title(pr: &PullRequest) -> String {
    format!("{} (#{})", pr.title, pr.number)
}

/// Open the pull request
///
/// Any failure, including a response without a PR number, surfaces as
/// [`Error::PrCreation`].
pub async fn create_pull_request(
    platform: &dyn PlatformService,
    pr: &NewPullRequest,
) -> Result<PullRequest> {
    let created = platform.create_pr(pr).await.map_err(|e| match e {
        Error::PrCreation(_) => e,
        other => Error::PrCreation(other.to_string()),
    })?;

    info!(number = created.number, url = %created.html_url, "opened pull request");
    Ok(created)
}

/// Merge an open pull request
///
/// Failures surface as [`Error::PrMerge`].
pub async fn merge_pull_request(
    platform: &dyn PlatformService,
    pull_request: &PullRequest,
    commit_message: &str,
) -> Result<MergeResult> {
    let merge = platform
        .merge_pr(
            pull_request.number,
            &merge_commit_title(pull_request),
            commit_message,
        )
        .await
        .map_err(|e| match e {
            Error::PrMerge(_) => e,
            other => Error::PrMerge(other.to_string()),
        })?;

    info!(number = pull_request.number, sha = ?merge.sha, "merged pull request");
    Ok(merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryState, PathStatus};
    use chrono::{TimeZone, Utc};

    fn make_changes(paths: &[&str]) -> ChangeSet {
        ChangeSet::from_statuses(paths.iter().map(|p| PathStatus {
            path: (*p).to_string(),
            in_head: true,
            workdir: EntryState::Changed,
            stage: EntryState::Unchanged,
        }))
    }

    #[test]
    fn test_build_pull_request() {
        let branch = PublishBranch::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let pr = build_pull_request(
            &branch,
            "main",
            "Update docs content\n\nSynced from CMS",
            &make_changes(&["content/a.md", "content/b.md"]),
        );

        assert_eq!(pr.head, branch.as_str());
        assert_eq!(pr.base, "main");
        assert_eq!(pr.title, "Update docs content");
        assert!(pr.body.contains(branch.as_str()));
        assert!(pr.body.contains("- `content/a.md`\n- `content/b.md`\n"));
    }

    #[test]
    fn test_merge_commit_title() {
        let pr = PullRequest {
            number: 42,
            html_url: String::new(),
            base_ref: "main".to_string(),
            head_ref: "content-publish-20240102-1".to_string(),
            title: "Update docs content".to_string(),
        };
        assert_eq!(merge_commit_title(&pr), "Update docs content (#42)");
    }
}
