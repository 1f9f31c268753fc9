use crate::config::Config;
use crate::domain::Version;
use crate::error::{GhOpsError, Result};
use crate::github::GitHubApi;
use crate::{handoff, ui};

/// Fetch the latest release version and write it to the hand-off file.
///
/// A repository without releases is not an error: the seed version `v0.0.0`
/// is used so the first pipeline run can bootstrap itself.
pub fn run(api: &dyn GitHubApi, owner: &str, repo: &str, config: &Config) -> Result<Version> {
    let version = match api.get_latest_release(owner, repo) {
        Ok(version) => version,
        Err(GhOpsError::NoReleasesFound { .. }) => {
            ui::display_status(&format!(
                "No releases found for {}/{}, seeding {}",
                owner,
                repo,
                Version::SEED
            ));
            Version::SEED
        }
        Err(e) => return Err(e),
    };

    handoff::write_version(&config.handoff.current_file, &version)?;
    Ok(version)
}
