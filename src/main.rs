use clap::Parser;

use gh_release_ops::config;
use gh_release_ops::domain::BumpPolicy;
use gh_release_ops::github::RestClient;
use gh_release_ops::operations::bump_version::BumpArgs;
use gh_release_ops::operations::create_release::ReleaseArgs;
use gh_release_ops::operations::update_submodule::{SubmoduleArgs, SubmoduleOutcome};
use gh_release_ops::operations::{bump_version, create_release, get_version, update_submodule};
use gh_release_ops::{ui, GhOpsError};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Action {
    GetVersion,
    BumpVersion,
    CreateRelease,
    UpdateSubmodule,
}

#[derive(clap::Parser)]
#[command(
    name = "gh-release-ops",
    about = "Automate GitHub release versioning and submodule updates inside CI pipelines"
)]
struct Args {
    #[arg(value_enum, help = "Action to perform")]
    action: Action,

    #[arg(short = 'o', long, help = "Repository owner")]
    repo_owner: String,

    #[arg(short = 'n', long, help = "Repository name")]
    repo_name: String,

    #[arg(
        short = 't',
        long,
        help = "GitHub token (falls back to the GITHUB_TOKEN environment variable)"
    )]
    github_token: Option<String>,

    #[arg(short = 'c', long, help = "Current version, e.g. v1.2.3")]
    current_version: Option<String>,

    #[arg(
        short = 'v',
        long,
        help = "Version bump type: major, minor, patch or timestamp"
    )]
    version_type: Option<BumpPolicy>,

    #[arg(short = 'p', long, help = "Pull request number driving the bump")]
    pr_number: Option<u64>,

    #[arg(long, help = "Merge commit to resolve a PR number from")]
    commit_sha: Option<String>,

    #[arg(
        short = 'd',
        long,
        action = clap::ArgAction::Set,
        help = "Create the release as a draft (default: true)"
    )]
    is_draft: Option<bool>,

    #[arg(short = 's', long, help = "Skip uploading the release asset")]
    skip_asset: bool,

    #[arg(short = 'r', long, help = "Parent repository holding the submodule")]
    parent_repo: Option<String>,

    #[arg(short = 'm', long, help = "Submodule path inside the parent repository")]
    submodule_path: Option<String>,

    #[arg(
        short = 'i',
        long,
        action = clap::ArgAction::Set,
        default_value_t = false,
        help = "Commit the submodule update directly instead of opening a pull request"
    )]
    is_merge: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    // The credential is resolved exactly once and injected into the client
    let token = args
        .github_token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .ok_or_else(|| GhOpsError::missing("github-token (or GITHUB_TOKEN)"))?;
    let client = RestClient::new(token, &config)?;

    let owner = args.repo_owner.as_str();
    let repo = args.repo_name.as_str();

    match args.action {
        Action::GetVersion => {
            let version = get_version::run(&client, owner, repo, &config)?;
            ui::display_success(&format!(
                "Latest version {} written to {}",
                version, config.handoff.current_file
            ));
        }
        Action::BumpVersion => {
            let bump_args = BumpArgs {
                current_version: args.current_version,
                version_type: args.version_type,
                pr_number: args.pr_number,
                commit_sha: args.commit_sha,
                is_merge: args.is_merge,
            };
            let version = bump_version::run(&client, owner, repo, &bump_args, &config)?;
            ui::display_success(&format!(
                "New version {} written to {}",
                version, config.handoff.new_file
            ));
        }
        Action::CreateRelease => {
            let release_args = ReleaseArgs {
                current_version: args.current_version,
                is_draft: args.is_draft,
                skip_asset: args.skip_asset,
            };
            let release_id = create_release::run(&client, owner, repo, &release_args, &config)?;
            ui::display_success(&format!("Created release with id {}", release_id));
        }
        Action::UpdateSubmodule => {
            let submodule_args = SubmoduleArgs {
                parent_repo: args.parent_repo,
                submodule_path: args.submodule_path,
                current_version: args.current_version,
                is_merge: args.is_merge,
            };
            match update_submodule::run(&client, owner, repo, &submodule_args, &config)? {
                SubmoduleOutcome::Committed { commit } => {
                    ui::display_success(&format!("Submodule pin committed as {}", commit));
                }
                SubmoduleOutcome::PullRequest { number } => {
                    ui::display_success(&format!("Submodule update tracked in PR #{}", number));
                }
            }
        }
    }

    Ok(())
}
