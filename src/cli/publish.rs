//! Publish command - run the update script and publish its changes

use crate::cli::args::{PublishArgs, resolve_credentials};
use crate::cli::progress::CliProgress;
use crate::cli::style::{Tint, Tone, done_mark, fail_mark, pr_link};
use anstream::{eprintln, println};
use anyhow::Result;
use content_publish::config::PublishConfig;
use content_publish::error::Error;
use content_publish::platform::{create_platform_service, resolve_repo_identity};
use content_publish::publish::{PublishOutcome, ShellScript, check_required_fields, publish};
use owo_colors::Stream;
use std::process::ExitCode;

/// Exit code for requests rejected before any side effect
pub const EXIT_INVALID: u8 = 2;

/// Exit code for runs that failed partway
pub const EXIT_FAILED: u8 = 1;

/// Run the publish command
pub async fn run_publish(args: &PublishArgs, dry_run: bool) -> Result<ExitCode> {
    let mut config = PublishConfig::from_env()?;
    args.apply_to(&mut config);

    let (credentials, _) = resolve_credentials().await;
    let request = args.to_request(&config, credentials);

    // Field checks first: the API client needs owner/repo before the pipeline runs
    let platform = match check_required_fields(&request)
        .and_then(|()| resolve_repo_identity(&request.repo_url))
    {
        Ok(identity) => create_platform_service(
            &identity,
            &request.credentials,
            config.api_base_url.as_deref(),
        )?,
        Err(e) => return Ok(reject(&e)),
    };
    let identity = platform.identity();

    let script = ShellScript::with_steps(
        config.install_command.as_deref(),
        config.build_command.as_deref(),
        &request.script,
    );

    println!(
        "Publishing {} into {}/{} ({})",
        request.content_path.out(Tone::Accent),
        identity.owner,
        identity.repo,
        request.base_branch.out(Tone::Accent)
    );

    let progress = CliProgress::new();
    let result = publish(
        &request,
        &config,
        &script,
        platform.as_ref(),
        &progress,
        dry_run,
    )
    .await;
    progress.finish();

    match result {
        Ok(outcome) => Ok(report(outcome)),
        // Already printed by the progress callback
        Err(_) => Ok(ExitCode::from(EXIT_INVALID)),
    }
}

/// Print a validation failure
pub fn reject(error: &Error) -> ExitCode {
    eprintln!("{} {}", fail_mark(), error.err(Tone::Bad));
    ExitCode::from(EXIT_INVALID)
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn report(outcome: PublishOutcome) -> ExitCode {
    println!();
    match outcome {
        PublishOutcome::Published(report) => {
            println!(
                "{} Published {} file{} via PR {}",
                done_mark(),
                report.changes.len().out(Tone::Accent),
                plural(report.changes.len()),
                pr_link(Stream::Stdout, &report.pull_request)
            );
            for path in report.changes.paths() {
                println!("  {}", path.out(Tone::Quiet));
            }
            println!("{}", "Done".out(Tone::Good));
            ExitCode::SUCCESS
        }
        PublishOutcome::NoChanges { .. } => {
            println!("{} Nothing to publish - content is up to date", done_mark());
            ExitCode::SUCCESS
        }
        PublishOutcome::DryRun { branch, changes } => {
            println!(
                "Would publish {} file{} on {}:",
                changes.len().out(Tone::Accent),
                plural(changes.len()),
                branch.out(Tone::Accent)
            );
            for path in changes.paths() {
                println!("  {}", path.out(Tone::Quiet));
            }
            ExitCode::SUCCESS
        }
        PublishOutcome::Failed(failure) => {
            let stage = failure.stage.to_string().to_lowercase();
            eprintln!(
                "{} Publish failed while {}: {}",
                fail_mark(),
                stage.err(Tone::Strong),
                failure.error.err(Tone::Bad)
            );
            if failure.pushed {
                let note = format!("Branch {} was pushed to the remote", failure.branch);
                eprintln!("  {}", note.err(Tone::Caution));
            }
            if let Some(pr) = &failure.pull_request {
                eprintln!(
                    "  {} {}",
                    "Left open and unmerged:".err(Tone::Caution),
                    pr_link(Stream::Stderr, pr)
                );
            }
            ExitCode::from(EXIT_FAILED)
        }
    }
}
