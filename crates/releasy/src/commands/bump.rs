//! Bump command.

use anyhow::{Context, Result};
use clap::Args;
use releasy_core::{ReleaseManager, update_version_file};

use super::{BumpTypeArg, open_project};

/// Arguments for the bump command.
#[derive(Debug, Args)]
pub struct BumpArgs {
    /// Perform a dry run without making changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Force a specific bump type (major, minor, patch)
    #[arg(short = 't', long, value_enum)]
    pub bump_type: Option<BumpTypeArg>,
}

/// Runs the bump command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: BumpArgs) -> Result<()> {
    let (repo, config) = open_project()?;
    let version = config.version.clone();

    let manager = ReleaseManager::new(repo, config);
    let plan = manager
        .plan(args.bump_type.map(Into::into))
        .context("failed to determine the next version")?;

    let path = manager.repo().path().join(&version.file);
    let previous = update_version_file(
        &path,
        &plan.next_version,
        version.pattern.as_deref(),
        args.dry_run,
    )
    .with_context(|| format!("failed to update {}", path.display()))?;

    let next = &plan.next_version;
    let bump = plan.bump_type;
    if args.dry_run {
        println!("Would bump {} {previous} -> {next} ({bump})", version.file);
    } else {
        println!("Bumped {} {previous} -> {next} ({bump})", version.file);
    }

    Ok(())
}
