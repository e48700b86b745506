//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Group commits into release notes, bump versions and publish releases.
#[derive(Debug, Parser)]
#[command(name = "releasy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default releasy.toml
    Init(commands::init::InitArgs),

    /// Bump the version file based on commits
    Bump(commands::bump::BumpArgs),

    /// Group a one-line commit log into release notes
    Notes(commands::notes::NotesArgs),

    /// Run a full release (bump, notes, commit, tag, push, publish)
    Release(commands::release::ReleaseArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args) => commands::init::run(args),
            Commands::Bump(args) => commands::bump::run(args),
            Commands::Notes(args) => commands::notes::run(args),
            Commands::Release(args) => commands::release::run(args),
        }
    }
}
