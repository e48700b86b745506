//! Release context shared between hooks.

use std::collections::HashMap;
use std::path::PathBuf;

use semver::Version;
use serde_json::Value;

use crate::BumpType;

/// Shared state passed to all hooks during the release process.
#[derive(Debug)]
pub struct ReleaseContext {
    /// Path to the repository root.
    pub repo_path: PathBuf,

    /// The version before the bump.
    pub previous_version: Version,

    /// The version after the bump.
    pub next_version: Version,

    /// The bump applied.
    pub bump_type: BumpType,

    /// The tag created for the release (e.g., "v1.2.3").
    pub tag: String,

    /// Rendered release notes.
    pub notes: String,

    /// Where the notes were written, once they have been.
    pub notes_path: Option<PathBuf>,

    /// Whether this is a dry run (no actual changes).
    pub dry_run: bool,

    /// Arbitrary metadata for inter-hook communication.
    pub metadata: HashMap<String, Value>,
}

impl ReleaseContext {
    /// Creates a new release context.
    #[must_use]
    pub fn new(
        repo_path: impl Into<PathBuf>,
        previous_version: Version,
        next_version: Version,
        bump_type: BumpType,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            previous_version,
            next_version,
            bump_type,
            tag: tag.into(),
            notes: String::new(),
            notes_path: None,
            dry_run: false,
            metadata: HashMap::new(),
        }
    }

    /// Sets the rendered notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the dry run flag.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Gets a metadata value.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Sets a metadata value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }
}
