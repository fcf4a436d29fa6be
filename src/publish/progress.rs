//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different front ends (CLI, CI log annotations, etc.) to
//! receive progress updates while a publish runs.

use crate::error::Error;
use async_trait::async_trait;
use std::fmt;

/// Pipeline stage
///
/// Stages run strictly in declaration order; a failed run reports the stage
/// it stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Checking the request and the remote
    Validating,
    /// Shallow-cloning the base branch into a scratch workspace
    Cloning,
    /// Creating the publish branch
    Branching,
    /// Running install, build and the update script
    Building,
    /// Computing the change set
    DetectingChanges,
    /// Staging and committing the change set
    Committing,
    /// Pushing the publish branch
    Pushing,
    /// Opening the pull request
    CreatingPr,
    /// Merging the pull request
    MergingPr,
    /// Run finished
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validating => "Validating",
            Self::Cloning => "Cloning",
            Self::Branching => "Creating branch",
            Self::Building => "Building",
            Self::DetectingChanges => "Detecting changes",
            Self::Committing => "Committing",
            Self::Pushing => "Pushing",
            Self::CreatingPr => "Creating pull request",
            Self::MergingPr => "Merging pull request",
            Self::Complete => "Done",
        };
        f.write_str(label)
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during a publish.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when a stage starts
    async fn on_stage(&self, stage: Stage);

    /// Called when a stage finishes successfully
    async fn on_stage_complete(&self, stage: Stage);

    /// Called when a stage fails; the run ends after this
    async fn on_error(&self, stage: Stage, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_stage(&self, _stage: Stage) {}
    async fn on_stage_complete(&self, _stage: Stage) {}
    async fn on_error(&self, _stage: Stage, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
