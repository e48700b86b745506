//! Configuration schema.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Placeholder substituted with the new version in commit messages.
const VERSION_PLACEHOLDER: &str = "{version}";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Version file configuration.
    #[serde(default)]
    pub version: VersionConfig,

    /// Release notes configuration.
    #[serde(default)]
    pub notes: NotesConfig,

    /// Git configuration.
    #[serde(default)]
    pub git: GitConfig,

    /// GitHub release configuration.
    #[serde(default)]
    pub github: GithubConfig,
}

impl Config {
    /// Checks values that parse but cannot drive a release.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.version.file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "version.file must not be empty".to_string(),
            ));
        }

        let output = Path::new(&self.notes.output);
        if output.as_os_str().is_empty()
            || output.is_absolute()
            || output.components().any(|c| c == Component::ParentDir)
        {
            return Err(ConfigError::Invalid(format!(
                "notes.output must be a relative path inside the repository, got {:?}",
                self.notes.output
            )));
        }

        if !self.git.commit_message.contains(VERSION_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "git.commit_message must contain {VERSION_PLACEHOLDER}"
            )));
        }

        Ok(())
    }

    /// Renders the configuration as a `releasy.toml` document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns a copy targeting another version file.
    #[must_use]
    pub fn with_version_file(mut self, file: impl Into<String>) -> Self {
        self.version.file = file.into();
        self
    }
}

/// Version file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    /// File whose version string is rewritten.
    #[serde(default = "default_version_file")]
    pub file: String,

    /// Regex locating the version in files that are neither TOML nor JSON.
    ///
    /// Must contain a capture group named `version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Tag prefix (e.g., "v").
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            file: default_version_file(),
            pattern: None,
            tag_prefix: default_tag_prefix(),
        }
    }
}

fn default_version_file() -> String {
    "Cargo.toml".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Release notes configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Output file path.
    #[serde(default = "default_notes_output")]
    pub output: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            output: default_notes_output(),
        }
    }
}

fn default_notes_output() -> String {
    "RELEASE_NOTES.md".to_string()
}

/// Git configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote pushed to after tagging.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch pushed to. Defaults to the checked out branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Release commit message; `{version}` is replaced with the new version.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Refuse to release from a dirty worktree.
    #[serde(default = "default_true")]
    pub require_clean: bool,
}

impl GitConfig {
    /// Renders the commit message for a version.
    #[must_use]
    pub fn commit_message_for(&self, version: &str) -> String {
        self.commit_message.replace(VERSION_PLACEHOLDER, version)
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            branch: None,
            commit_message: default_commit_message(),
            require_clean: true,
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "Release {version}".to_string()
}

fn default_true() -> bool {
    true
}

/// GitHub release configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Publish a GitHub release after tagging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Create release as draft.
    #[serde(default)]
    pub draft: bool,

    /// Mark release as prerelease.
    #[serde(default)]
    pub prerelease: bool,

    /// Assets to upload.
    #[serde(default)]
    pub assets: Vec<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            draft: false,
            prerelease: false,
            assets: Vec::new(),
        }
    }
}
