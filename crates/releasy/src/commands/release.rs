//! Release command.

use anyhow::{Context, Result};
use clap::Args;
use releasy_core::{ReleaseManager, ReleaseOptions};
use releasy_hook_github_release::{GithubReleaseHook, RELEASE_URL_KEY};
use tracing::info;

use super::{BumpTypeArg, open_project};

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Perform a dry run without making changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Force a specific bump type (major, minor, patch)
    #[arg(short = 't', long, value_enum)]
    pub bump_type: Option<BumpTypeArg>,

    /// Skip pushing the release commit and tag (also skips publishing)
    #[arg(long)]
    pub no_push: bool,

    /// Skip publishing the GitHub release
    #[arg(long)]
    pub no_publish: bool,
}

/// Runs the release command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ReleaseArgs) -> Result<()> {
    let (repo, config) = open_project()?;
    let github = config.github.clone();
    let remote = config.git.remote.clone();

    let mut manager = ReleaseManager::new(repo, config);
    let publish = github.enabled && !args.no_publish;
    if publish && args.no_push {
        info!("tag is not pushed, skipping GitHub release");
    } else if publish {
        manager = manager.with_hook(Box::new(
            GithubReleaseHook::new()
                .with_draft(github.draft)
                .with_prerelease(github.prerelease)
                .with_assets(github.assets),
        ));
    }

    let options = ReleaseOptions::default()
        .with_bump(args.bump_type.map(Into::into))
        .dry_run(args.dry_run)
        .push(!args.no_push);
    let outcome = manager.release(options).context("release failed")?;
    let plan = &outcome.plan;

    println!(
        "Version: {} -> {} ({})",
        plan.previous_version, plan.next_version, plan.bump_type
    );
    println!();
    print!("{}", plan.notes);

    if outcome.dry_run {
        println!(
            "Dry run: would tag {} and write {}. No changes were made.",
            plan.tag,
            outcome.notes_path.display()
        );
        return Ok(());
    }

    println!("Released {}", plan.tag);
    if outcome.pushed {
        println!("Pushed to {remote}");
    }
    if let Some(url) = outcome.metadata.get(RELEASE_URL_KEY).and_then(|v| v.as_str()) {
        println!("GitHub release: {url}");
    }

    Ok(())
}
