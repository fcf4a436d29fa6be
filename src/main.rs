//! content-publish - publish script-generated content as a merged pull request
//!
//! CLI binary, typically invoked once per CI trigger.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "content-publish")]
#[command(about = "Run a content update script and publish its changes as a merged PR")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    publish: cli::PublishArgs,

    /// Dry run - stop after change detection
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish content changes (default)
    Publish {
        #[command(flatten)]
        args: cli::PublishArgs,

        /// Dry run - stop after change detection
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the request, remote, scratch directory and token without side effects
    Validate {
        #[command(flatten)]
        args: cli::PublishArgs,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("content_publish=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        None => cli::run_publish(&cli.publish, cli.dry_run).await,
        Some(Commands::Publish { args, dry_run }) => cli::run_publish(&args, dry_run).await,
        Some(Commands::Validate { args }) => cli::run_validate(&args).await,
    }
}
