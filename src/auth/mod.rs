//! Credential resolution for git and the hosting API
//!
//! Supports environment variables and the `gh` CLI.

mod github;

pub use github::{get_credentials, get_credentials_from, test_credentials, CredentialsConfig};

/// Source of the password / token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the `gh` CLI
    Cli,
    /// Token from an environment variable
    EnvVar,
}
