//! Core error types.

use thiserror::Error;

use crate::FileUpdateError;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] releasy_git::GitError),

    /// Hook error.
    #[error("plugin error: {0}")]
    Plugin(#[from] releasy_plugin::PluginError),

    /// Version file error.
    #[error("version file error: {0}")]
    File(#[from] FileUpdateError),

    /// The worktree has uncommitted changes.
    #[error("working tree has uncommitted changes")]
    DirtyWorktree,

    /// No commits found for release.
    #[error("no commits found since last release")]
    NoCommits,

    /// Commits exist but none calls for a version bump.
    #[error("no releasable changes since last release; pass a bump type to force one")]
    NothingToRelease,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
