//! Notes command.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use releasy_notes::write_release_notes;
use tracing::info;

use super::open_project;

/// Arguments for the notes command.
#[derive(Debug, Args)]
pub struct NotesArgs {
    /// Read the one-line log from a file, or `-` for stdin (default: git)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the notes to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start from this tag instead of the latest version tag
    #[arg(long, conflicts_with = "input")]
    pub since: Option<String>,
}

fn read_log(args: &NotesArgs) -> Result<String> {
    match &args.input {
        Some(path) if path.as_os_str() == "-" => {
            let mut log = String::new();
            io::stdin()
                .read_to_string(&mut log)
                .context("failed to read log from stdin")?;
            Ok(log)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let (repo, config) = open_project()?;
            let since = match &args.since {
                Some(tag) => Some(tag.clone()),
                None => repo
                    .latest_version_tag(&config.version.tag_prefix)
                    .context("failed to get latest version tag")?,
            };
            repo.oneline_log(since.as_deref())
                .context("failed to read commit log")
        }
    }
}

/// Runs the notes command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: NotesArgs) -> Result<()> {
    let log = read_log(&args)?;

    let notes = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let notes = write_release_notes(&log, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "wrote release notes");
            notes
        }
        None => {
            let mut stdout = io::stdout().lock();
            let notes = write_release_notes(&log, &mut stdout)?;
            stdout.flush()?;
            notes
        }
    };

    info!(
        entries = notes.len(),
        malformed = notes.malformed(),
        "grouped commits"
    );
    Ok(())
}
