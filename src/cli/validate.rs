//! Validate command - check a publish request without side effects

use crate::cli::args::{PublishArgs, resolve_credentials};
use crate::cli::publish::reject;
use crate::cli::style::{Tint, Tone, done_mark};
use anstream::println;
use anyhow::Result;
use content_publish::auth::test_credentials;
use content_publish::config::PublishConfig;
use content_publish::platform::api_base_url;
use content_publish::publish::{git_client, validate_request};
use std::process::ExitCode;

/// Run the validate command
pub async fn run_validate(args: &PublishArgs) -> Result<ExitCode> {
    let mut config = PublishConfig::from_env()?;
    args.apply_to(&mut config);

    let (credentials, source) = resolve_credentials().await;
    let request = args.to_request(&config, credentials);

    let git = git_client(&request.credentials, &config);
    let identity = match validate_request(&request, &git).await {
        Ok(identity) => identity,
        Err(e) => return Ok(reject(&e)),
    };

    println!(
        "{} Repository {}/{} ({})",
        done_mark(),
        identity.owner.out(Tone::Accent),
        identity.repo.out(Tone::Accent),
        identity.clone_url.out(Tone::Quiet)
    );
    println!(
        "{} Base branch {} exists",
        done_mark(),
        request.base_branch.out(Tone::Accent)
    );
    println!(
        "{} Scratch directory {} is writable",
        done_mark(),
        request.scratch_root.display().out(Tone::Accent)
    );

    let api_base = config.api_base_url.clone().or_else(|| api_base_url(&identity));
    match test_credentials(&request.credentials, api_base.as_deref()).await {
        Ok(login) => {
            println!("{} Token accepted for {}", done_mark(), login.out(Tone::Accent));
            if let Some(source) = source {
                println!("Token source: {source:?}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(reject(&e)),
    }
}
