use crate::config::Config;
use crate::domain::Version;
use crate::error::{GhOpsError, Result};
use crate::github::GitHubApi;
use crate::operations::resolve_version;
use crate::ui;

/// Parameters for the update-submodule operation
#[derive(Debug, Clone, Default)]
pub struct SubmoduleArgs {
    pub parent_repo: Option<String>,
    pub submodule_path: Option<String>,
    pub current_version: Option<String>,
    pub is_merge: bool,
}

/// How the submodule pin landed in the parent repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmoduleOutcome {
    /// Committed directly to the parent's default branch
    Committed { commit: String },
    /// Left on a feature branch with a pull request open
    PullRequest { number: u64 },
}

/// Move the parent repository's submodule pin to the released commit.
///
/// With `--is-merge` the new pin is committed straight to the parent's
/// default branch; otherwise the change lands on an `update-*` branch and a
/// pull request is opened (or the existing one refreshed). The PR is labeled
/// so a later bump-version run sees it as a patch.
pub fn run(
    api: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    args: &SubmoduleArgs,
    config: &Config,
) -> Result<SubmoduleOutcome> {
    let parent = args
        .parent_repo
        .as_deref()
        .ok_or_else(|| GhOpsError::missing("parent-repo"))?;
    let path = args
        .submodule_path
        .as_deref()
        .ok_or_else(|| GhOpsError::missing("submodule-path"))?;

    let version = resolve_version(
        &config.handoff.new_file,
        args.current_version.as_deref(),
        "current-version",
    )?;
    let version = Version::parse(&version)?;
    let tag = version.to_string();

    let base = api.default_branch(owner, parent)?;
    let new_commit = api.resolve_tag_commit(owner, repo, &tag)?;
    let pinned = api.get_file(owner, parent, path, &base)?;
    ui::display_status(&format!(
        "Moving {} pin from {} to {}",
        path, pinned.sha, new_commit
    ));

    let message = format!("chore: update {} submodule to {}", repo, tag);

    if args.is_merge {
        let commit =
            api.update_file(owner, parent, path, &new_commit, Some(&pinned.sha), &base, &message)?;
        ui::display_success(&format!("Committed submodule update {} to {}", commit, base));
        return Ok(SubmoduleOutcome::Committed { commit });
    }

    let branch = format!("update-{}-{}", repo, tag);
    api.ensure_branch(owner, parent, &branch, &base)?;

    // The branch may already carry an earlier pin, so re-read the blob hash
    // there rather than reusing the default branch's
    let on_branch = api.get_file(owner, parent, path, &branch)?;
    api.update_file(
        owner,
        parent,
        path,
        &new_commit,
        Some(&on_branch.sha),
        &branch,
        &message,
    )?;

    let title = format!("Update {} submodule to {}", repo, tag);
    let body = format!(
        "This PR updates the {} submodule pin from `{}` to `{}`.\n\nVersion: {}",
        repo, pinned.sha, new_commit, tag
    );
    let number = api.create_or_update_pull_request(owner, parent, &branch, &base, &title, &body)?;

    // Label so the parent's next bump-version treats this as a patch; labels
    // are best-effort, the PR itself is the deliverable
    if let Some(label) = patch_label(config) {
        if let Err(e) = api.add_labels(owner, parent, number, &[label]) {
            ui::display_warning(&format!("Could not label PR #{}: {}", number, e));
        }
    }

    ui::display_success(&format!("Opened PR #{} against {}", number, base));
    Ok(SubmoduleOutcome::PullRequest { number })
}

/// The configured label that maps to a patch bump, if any
fn patch_label(config: &Config) -> Option<String> {
    config
        .labels
        .iter()
        .find(|(_, policy)| policy.as_str() == "patch")
        .map(|(label, _)| label.clone())
}
