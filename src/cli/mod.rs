//! CLI commands
//!
//! Command implementations for the `content-publish` binary.

mod args;
mod progress;
mod publish;
mod style;
mod validate;

pub use args::PublishArgs;
pub use publish::run_publish;
pub use validate::run_validate;
