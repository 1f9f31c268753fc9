use crate::config::Config;
use crate::domain::version::{BumpPolicy, Version};
use crate::domain::labels;
use crate::error::Result;
use crate::github::GitHubApi;
use crate::operations::resolve_version;
use crate::{handoff, ui};

/// Parameters for the bump-version operation
#[derive(Debug, Clone, Default)]
pub struct BumpArgs {
    pub current_version: Option<String>,
    pub version_type: Option<BumpPolicy>,
    pub pr_number: Option<u64>,
    pub commit_sha: Option<String>,
    pub is_merge: bool,
}

/// Compute the next version and write it to the hand-off file.
///
/// The current version comes from the previous stage's hand-off file, falling
/// back to the `--current-version` flag. The policy is resolved in order:
/// labels of the driving pull request (looked up by number, or from the merge
/// commit when `--is-merge` is set), then the `--version-type` flag, then a
/// timestamp bump. No check is made that the supplied version matches the
/// repository's actual latest release.
pub fn run(
    api: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    args: &BumpArgs,
    config: &Config,
) -> Result<Version> {
    let current = resolve_version(
        &config.handoff.current_file,
        args.current_version.as_deref(),
        "current-version",
    )?;
    let current = Version::parse(&current)?;

    let mut pr_number = args.pr_number;
    if pr_number.is_none() && args.is_merge {
        if let Some(sha) = &args.commit_sha {
            ui::display_status(&format!("Looking up PR number from merge commit {}", sha));
            pr_number = api.find_pr_for_commit(owner, repo, sha)?;
        }
    }

    let mut policy = args.version_type;
    if let Some(number) = pr_number {
        ui::display_status(&format!("Determining version type from PR #{}", number));
        match api.get_pull_request(owner, repo, number) {
            Ok(pr) => {
                let from_labels = labels::policy_from_labels(&pr.labels, &config.labels)?;
                policy = Some(from_labels.unwrap_or(BumpPolicy::Timestamp));
            }
            Err(e) => {
                ui::display_warning(&format!(
                    "Could not read PR #{}: {}. Falling back to the version-type flag",
                    number, e
                ));
            }
        }
    }

    let policy = policy.unwrap_or(BumpPolicy::Timestamp);
    ui::display_status(&format!("Bumping {} with policy {}", current, policy));

    let new_version = current.bump(policy);
    handoff::write_version(&config.handoff.new_file, &new_version)?;
    Ok(new_version)
}
