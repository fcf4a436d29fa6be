//! Publish configuration
//!
//! All ambient settings live in [`PublishConfig`], built once (usually from the
//! process environment) and handed to the pipeline. Nothing below `config`
//! reads environment variables on its own.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Default base branch when the caller names none
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Default dependency install step
pub const DEFAULT_INSTALL_COMMAND: &str = "npm ci";

/// Default build step
pub const DEFAULT_BUILD_COMMAND: &str = "npm run build";

/// Settings shared by every publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Base branch used when the invocation does not name one
    pub default_base_branch: String,
    /// Commit author name
    pub author_name: String,
    /// Commit author email
    pub author_email: String,
    /// Prefix prepended to the random scratch directory name
    pub scratch_prefix: String,
    /// Directory under which scratch workspaces are created
    pub scratch_root: PathBuf,
    /// Dependency install step run before the update script
    pub install_command: Option<String>,
    /// Build step run before the update script
    pub build_command: Option<String>,
    /// Hosting API base URL; derived from the git host when unset
    pub api_base_url: Option<String>,
    /// Leave the scratch workspace on disk after the run
    pub keep_workspace: bool,
    /// Extra `-c key=value` settings applied to every git invocation
    pub git_config: Vec<(String, String)>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_base_branch: DEFAULT_BASE_BRANCH.to_string(),
            author_name: "Content Publisher".to_string(),
            author_email: "content-publisher@users.noreply.github.com".to_string(),
            scratch_prefix: String::new(),
            scratch_root: env::temp_dir(),
            install_command: Some(DEFAULT_INSTALL_COMMAND.to_string()),
            build_command: Some(DEFAULT_BUILD_COMMAND.to_string()),
            api_base_url: None,
            keep_workspace: false,
            git_config: Vec::new(),
        }
    }
}

impl PublishConfig {
    /// Build configuration from `CONTENT_PUBLISH_*` environment variables
    ///
    /// Unset variables keep their defaults. An empty install or build command
    /// disables that step.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(branch) = non_empty(lookup("CONTENT_PUBLISH_BASE_BRANCH")) {
            config.default_base_branch = branch;
        }
        if let Some(name) = non_empty(lookup("CONTENT_PUBLISH_AUTHOR_NAME")) {
            config.author_name = name;
        }
        if let Some(email) = non_empty(lookup("CONTENT_PUBLISH_AUTHOR_EMAIL")) {
            config.author_email = email;
        }
        if let Some(prefix) = lookup("CONTENT_PUBLISH_SCRATCH_PREFIX") {
            config.scratch_prefix = prefix;
        }
        if let Some(root) = non_empty(lookup("CONTENT_PUBLISH_SCRATCH_ROOT")) {
            config.scratch_root = PathBuf::from(root);
        }
        if let Some(install) = lookup("CONTENT_PUBLISH_INSTALL_COMMAND") {
            config.install_command = non_empty(Some(install));
        }
        if let Some(build) = lookup("CONTENT_PUBLISH_BUILD_COMMAND") {
            config.build_command = non_empty(Some(build));
        }
        config.api_base_url = non_empty(lookup("CONTENT_PUBLISH_API_URL"));
        if let Some(keep) = lookup("CONTENT_PUBLISH_KEEP_WORKSPACE") {
            config.keep_workspace = parse_bool("CONTENT_PUBLISH_KEEP_WORKSPACE", &keep)?;
        }

        Ok(config)
    }

    /// Add a git `-c` setting, e.g. a `url.<base>.insteadOf` mirror
    #[must_use]
    pub fn with_git_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.git_config.push((key.into(), value.into()));
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PublishConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PublishConfig::default());
        assert_eq!(config.default_base_branch, "main");
        assert_eq!(config.install_command.as_deref(), Some("npm ci"));
    }

    #[test]
    fn test_overrides() {
        let config = PublishConfig::from_lookup(lookup_from(&[
            ("CONTENT_PUBLISH_BASE_BRANCH", "develop"),
            ("CONTENT_PUBLISH_AUTHOR_NAME", "Docs Bot"),
            ("CONTENT_PUBLISH_AUTHOR_EMAIL", "docs@example.com"),
            ("CONTENT_PUBLISH_SCRATCH_PREFIX", "publish-"),
            ("CONTENT_PUBLISH_SCRATCH_ROOT", "/var/tmp"),
            ("CONTENT_PUBLISH_API_URL", "https://ghe.example.com/api/v3"),
            ("CONTENT_PUBLISH_KEEP_WORKSPACE", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.default_base_branch, "develop");
        assert_eq!(config.author_name, "Docs Bot");
        assert_eq!(config.author_email, "docs@example.com");
        assert_eq!(config.scratch_prefix, "publish-");
        assert_eq!(config.scratch_root, PathBuf::from("/var/tmp"));
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert!(config.keep_workspace);
    }

    #[test]
    fn test_empty_command_disables_step() {
        let config = PublishConfig::from_lookup(lookup_from(&[
            ("CONTENT_PUBLISH_INSTALL_COMMAND", ""),
            ("CONTENT_PUBLISH_BUILD_COMMAND", "yarn build"),
        ]))
        .unwrap();
        assert!(config.install_command.is_none());
        assert_eq!(config.build_command.as_deref(), Some("yarn build"));
    }

    #[test]
    fn test_bad_bool_rejected() {
        let err = PublishConfig::from_lookup(lookup_from(&[(
            "CONTENT_PUBLISH_KEEP_WORKSPACE",
            "maybe",
        )]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_with_git_config() {
        let config = PublishConfig::default()
            .with_git_config("url.file:///srv/mirror/.insteadOf", "https://github.com/");
        assert_eq!(config.git_config.len(), 1);
    }
}
