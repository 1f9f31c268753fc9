use crate::config::Config;
use crate::domain::{ReleaseRequest, Version};
use crate::error::Result;
use crate::github::GitHubApi;
use crate::operations::resolve_version;
use crate::ui;
use std::fs;

/// Parameters for the create-release operation
#[derive(Debug, Clone, Default)]
pub struct ReleaseArgs {
    pub current_version: Option<String>,
    pub is_draft: Option<bool>,
    pub skip_asset: bool,
}

/// Create a GitHub release for the version computed by the previous stage.
///
/// Releases default to draft so a human (or a later pipeline stage) promotes
/// them explicitly. Unless `--skip-asset` is set, the build artifact from the
/// working directory is attached to the release; a missing artifact is an
/// error.
pub fn run(
    api: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    args: &ReleaseArgs,
    config: &Config,
) -> Result<u64> {
    let version = resolve_version(
        &config.handoff.new_file,
        args.current_version.as_deref(),
        "current-version",
    )?;
    let version = Version::parse(&version)?;
    let tag = version.to_string();

    let request = ReleaseRequest::for_tag(&tag, args.is_draft.unwrap_or(true));
    let release_id = api.create_release(owner, repo, &request)?;
    ui::display_success(&format!("Created release {} (id {})", tag, release_id));

    if !args.skip_asset {
        ui::display_status(&format!("Uploading {} to release", config.release.asset_file));
        let data = fs::read(&config.release.asset_file)?;
        api.upload_release_asset(
            owner,
            repo,
            release_id,
            &config.release.asset_file,
            &config.release.asset_content_type,
            data,
        )?;
        ui::display_success(&format!("Uploaded {}", config.release.asset_file));
    }

    Ok(release_id)
}
