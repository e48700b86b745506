//! Subcommands.

pub mod bump;
pub mod init;
pub mod notes;
pub mod release;

use anyhow::{Context, Result};
use clap::ValueEnum;
use releasy_config::{Config, ConfigError, find_and_load_config};
use releasy_git::Repository;
use releasy_plugin::BumpType;
use tracing::info;

/// Bump type argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BumpTypeArg {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    Patch,
}

impl From<BumpTypeArg> for BumpType {
    fn from(arg: BumpTypeArg) -> Self {
        match arg {
            BumpTypeArg::Major => BumpType::Major,
            BumpTypeArg::Minor => BumpType::Minor,
            BumpTypeArg::Patch => BumpType::Patch,
        }
    }
}

/// Loads `releasy.toml`, falling back to defaults when there is none.
pub fn load_config() -> Result<Config> {
    match find_and_load_config() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(path)) => {
            info!(path = %path.display(), "no configuration file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("failed to load configuration"),
    }
}

/// Opens the repository around the current directory and its configuration.
pub fn open_project() -> Result<(Repository, Config)> {
    let repo = Repository::discover().context("failed to open git repository")?;
    let config = load_config()?;
    Ok((repo, config))
}
