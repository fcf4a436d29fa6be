//! Platform service factory

use crate::error::Result;
use crate::platform::{api_base_url, GitHubService, PlatformService};
use crate::types::{Credentials, RepoIdentity};

/// Create the platform service for a repository
///
/// The git password doubles as the API bearer token. `api_base_override`
/// takes precedence over the URL derived from the git host.
pub fn create_platform_service(
    identity: &RepoIdentity,
    credentials: &Credentials,
    api_base_override: Option<&str>,
) -> Result<Box<dyn PlatformService>> {
    let base = api_base_override
        .map(ToString::to_string)
        .or_else(|| api_base_url(identity));

    Ok(Box::new(GitHubService::new(
        &credentials.password,
        identity.clone(),
        base.as_deref(),
    )?))
}
