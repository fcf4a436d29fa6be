//! Publish pipeline
//!
//! Validation gates everything: a rejected request returns `Err` before any
//! workspace exists. From workspace creation onward every failure is caught
//! and reported as [`PublishOutcome::Failed`] with the stage it happened in.

use crate::config::PublishConfig;
use crate::error::{Error, Result};
use crate::git::{Author, GitCli};
use crate::platform::PlatformService;
use crate::publish::changes::detect_changes;
use crate::publish::commit::{commit_changes, push_branch};
use crate::publish::progress::{ProgressCallback, Stage};
use crate::publish::pull_request::{build_pull_request, create_pull_request, merge_pull_request};
use crate::publish::script::{run_update_script, UpdateScript};
use crate::publish::validate::validate_request;
use crate::publish::workspace::{checkout_publish_branch, clone_workspace};
use crate::types::{
    ChangeSet, Credentials, MergeResult, PublishBranch, PublishRequest, PullRequest, RepoIdentity,
};
use std::future::Future;
use tracing::{error, info};

/// A fully published change
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Publish branch that was pushed
    pub branch: PublishBranch,
    /// Files committed
    pub changes: ChangeSet,
    /// Commit id of the content commit
    pub commit: String,
    /// The merged pull request
    pub pull_request: PullRequest,
    /// Merge details
    pub merge: MergeResult,
}

/// A run that stopped partway
#[derive(Debug)]
pub struct PublishFailure {
    /// Stage the run failed in
    pub stage: Stage,
    /// Underlying cause
    pub error: Error,
    /// Publish branch of the run
    pub branch: PublishBranch,
    /// Whether the branch reached the remote
    pub pushed: bool,
    /// PR opened before the failure, if any
    pub pull_request: Option<PullRequest>,
}

/// How a validated run ended
#[derive(Debug)]
pub enum PublishOutcome {
    /// Changes committed, pushed, and merged
    Published(PublishReport),
    /// The script left the content path untouched; nothing was committed
    NoChanges {
        /// Publish branch that was created locally
        branch: PublishBranch,
    },
    /// Dry run stopped after change detection
    DryRun {
        /// Publish branch that would have been pushed
        branch: PublishBranch,
        /// Files that would have been committed
        changes: ChangeSet,
    },
    /// A stage failed
    Failed(PublishFailure),
}

impl PublishOutcome {
    /// Whether the run ended without a failure
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Failed stage, if any
    pub const fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Failed(failure) => Some(failure.stage),
            _ => None,
        }
    }
}

/// Git client authenticated with the request's credentials and configured settings
pub fn git_client(credentials: &Credentials, config: &PublishConfig) -> GitCli {
    config
        .git_config
        .iter()
        .fold(GitCli::new().with_credentials(credentials), |git, (k, v)| {
            git.with_config(k.clone(), v.clone())
        })
}

/// Run a publish end to end
///
/// Returns `Err` only for validation failures (including an unparseable
/// repository URL), which happen before any side effect. Everything after
/// that is reported through the returned [`PublishOutcome`].
pub async fn publish(
    request: &PublishRequest,
    config: &PublishConfig,
    script: &dyn UpdateScript,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
    dry_run: bool,
) -> Result<PublishOutcome> {
    let branch = PublishBranch::now();
    let git = git_client(&request.credentials, config);

    progress.on_stage(Stage::Validating).await;
    let identity = match validate_request(request, &git).await {
        Ok(identity) => identity,
        Err(e) => {
            progress.on_error(Stage::Validating, &e).await;
            return Err(e);
        }
    };
    progress.on_stage_complete(Stage::Validating).await;

    info!(%branch, dry_run, "starting publish");

    let mut run = Run {
        request,
        config,
        identity,
        branch,
        git,
        script,
        platform,
        progress,
        pushed: false,
        pull_request: None,
    };

    match run.execute(dry_run).await {
        Ok(outcome) => {
            progress.on_stage(Stage::Complete).await;
            Ok(outcome)
        }
        Err((stage, error)) => {
            error!(%stage, "publish failed: {error}");
            Ok(PublishOutcome::Failed(PublishFailure {
                stage,
                error,
                branch: run.branch,
                pushed: run.pushed,
                pull_request: run.pull_request,
            }))
        }
    }
}

type StageResult<T> = std::result::Result<T, (Stage, Error)>;

struct Run<'a> {
    request: &'a PublishRequest,
    config: &'a PublishConfig,
    identity: RepoIdentity,
    branch: PublishBranch,
    git: GitCli,
    script: &'a dyn UpdateScript,
    platform: &'a dyn PlatformService,
    progress: &'a dyn ProgressCallback,
    pushed: bool,
    pull_request: Option<PullRequest>,
}

impl Run<'_> {
    async fn step<T, F>(&self, stage: Stage, fut: F) -> StageResult<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.progress.on_stage(stage).await;
        match fut.await {
            Ok(value) => {
                self.progress.on_stage_complete(stage).await;
                Ok(value)
            }
            Err(e) => {
                self.progress.on_error(stage, &e).await;
                Err((stage, e))
            }
        }
    }

    async fn execute(&mut self, dry_run: bool) -> StageResult<PublishOutcome> {
        let request = self.request;

        // Dropped on every return path below, which removes the directory
        let workspace = self
            .step(
                Stage::Cloning,
                clone_workspace(
                    &self.git,
                    &self.identity,
                    &request.base_branch,
                    &request.scratch_root,
                    &self.config.scratch_prefix,
                    self.config.keep_workspace,
                ),
            )
            .await?;

        self.step(
            Stage::Branching,
            checkout_publish_branch(&self.git, &workspace, &self.branch),
        )
        .await?;

        self.step(
            Stage::Building,
            run_update_script(self.script, workspace.path()),
        )
        .await?;

        let changes = self
            .step(
                Stage::DetectingChanges,
                detect_changes(&self.git, workspace.path(), &request.content_path),
            )
            .await?;

        if changes.is_empty() {
            self.progress
                .on_message("No changes under the content path - nothing to publish")
                .await;
            return Ok(PublishOutcome::NoChanges {
                branch: self.branch.clone(),
            });
        }

        if dry_run {
            self.progress
                .on_message("Dry run - stopping before commit")
                .await;
            return Ok(PublishOutcome::DryRun {
                branch: self.branch.clone(),
                changes,
            });
        }

        let author = Author {
            name: self.config.author_name.clone(),
            email: self.config.author_email.clone(),
        };
        let commit = self
            .step(
                Stage::Committing,
                commit_changes(
                    &self.git,
                    workspace.path(),
                    &changes,
                    &request.commit_message,
                    &author,
                ),
            )
            .await?;

        self.step(
            Stage::Pushing,
            push_branch(&self.git, workspace.path(), &self.branch),
        )
        .await?;
        self.pushed = true;

        let new_pr = build_pull_request(
            &self.branch,
            &request.base_branch,
            &request.commit_message,
            &changes,
        );
        let pull_request = self
            .step(
                Stage::CreatingPr,
                create_pull_request(self.platform, &new_pr),
            )
            .await?;
        self.pull_request = Some(pull_request.clone());

        let merge = self
            .step(
                Stage::MergingPr,
                merge_pull_request(self.platform, &pull_request, &request.commit_message),
            )
            .await?;

        Ok(PublishOutcome::Published(PublishReport {
            branch: self.branch.clone(),
            changes,
            commit,
            pull_request,
            merge,
        }))
    }
}
