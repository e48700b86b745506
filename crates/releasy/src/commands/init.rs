//! Initialize command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use releasy_config::{CONFIG_FILE_NAME, Config};
use tracing::info;

/// Version files looked for, in order, when `--file` is not given.
const KNOWN_VERSION_FILES: &[&str] = &["Cargo.toml", "package.json", "pyproject.toml"];

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// File holding the project version (detected when omitted)
    #[arg(long)]
    pub file: Option<String>,
}

fn detect_version_file(dir: &Path) -> Option<&'static str> {
    KNOWN_VERSION_FILES
        .iter()
        .copied()
        .find(|name| dir.join(name).is_file())
}

/// Runs the init command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: InitArgs) -> Result<()> {
    let dir = std::env::current_dir().context("failed to read current directory")?;
    let path = dir.join(CONFIG_FILE_NAME);

    if path.exists() && !args.force {
        bail!(
            "{} already exists; use --force to overwrite it",
            path.display()
        );
    }

    let mut config = Config::default();
    if let Some(file) = args
        .file
        .clone()
        .or_else(|| detect_version_file(&dir).map(String::from))
    {
        config = config.with_version_file(file);
    }
    config.validate()?;
    info!(file = %config.version.file, "using version file");

    let content = format!("# Releasy configuration\n\n{}", config.to_toml()?);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
