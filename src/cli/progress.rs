//! CLI progress callback: a spinner per stage, one line per finished stage

use crate::cli::style::{Tint, Tone, done_mark, fail_mark, spinner_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use content_publish::error::Error;
use content_publish::publish::{ProgressCallback, Stage};
use indicatif::ProgressBar;
use std::time::Duration;

/// Prints stage progress to the terminal
///
/// Lines are written through [`ProgressBar::suspend`] so they still appear
/// when the spinner is hidden (non-TTY CI logs).
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start the spinner
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Stop and clear the spinner
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_stage(&self, stage: Stage) {
        if stage != Stage::Complete {
            self.spinner.set_message(format!("{stage}..."));
            self.spinner.reset_elapsed();
        }
    }

    async fn on_stage_complete(&self, stage: Stage) {
        self.spinner
            .suspend(|| println!("{} {}", done_mark(), stage.out(Tone::Strong)));
    }

    async fn on_error(&self, stage: Stage, error: &Error) {
        self.spinner.suspend(|| {
            eprintln!(
                "{} {}: {}",
                fail_mark(),
                stage.err(Tone::Strong),
                error.err(Tone::Bad)
            );
        });
    }

    async fn on_message(&self, message: &str) {
        self.spinner
            .suspend(|| println!("  {}", message.out(Tone::Quiet)));
    }
}
