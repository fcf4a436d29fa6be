//! Publish pipeline
//!
//! Turns an update script's side effects into a merged pull request:
//! 1. Validation - request fields, base branch on the remote, scratch root
//! 2. Provisioning - shallow clone and publish branch
//! 3. Build - install, build and the caller's script
//! 4. Change detection - three-way status under the content path
//! 5. Commit and push - exactly the changed files
//! 6. Pull request - open, then merge

mod changes;
mod commit;
mod pipeline;
mod progress;
mod pull_request;
mod script;
mod validate;
mod workspace;

pub use changes::{content_pathspec, detect_changes, is_within, scope_changes};
pub use commit::{commit_changes, push_branch};
pub use pipeline::{git_client, publish, PublishFailure, PublishOutcome, PublishReport};
pub use progress::{NoopProgress, ProgressCallback, Stage};
pub use pull_request::{
    build_pull_request, create_pull_request, merge_commit_title, merge_pull_request,
};
pub use script::{run_update_script, ScriptFailure, ShellScript, UpdateScript};
pub use validate::{check_required_fields, check_scratch_root, validate_request};
pub use workspace::{checkout_publish_branch, clone_workspace, Workspace};
