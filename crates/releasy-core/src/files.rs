//! Version file updaters.
//!
//! Rewrites the version string of a source file in place, leaving every
//! other byte untouched:
//! - Cargo.toml / `*.toml`: the first `version = "..."` line
//! - package.json / `*.json`: the top-level `"version"` key
//! - anything else: a regex with a capture group named `version`

use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use semver::Version;
use thiserror::Error;
use tracing::{debug, info};

/// Pattern used for files that are neither TOML nor JSON.
///
/// Matches lines such as `__version__ = "1.2.3"`, `VERSION: '1.2.3'` or
/// `version = "1.2.3"`. Compiled in multi-line mode.
pub const DEFAULT_VERSION_PATTERN: &str =
    r#"^\s*(__version__|VERSION|version)\s*[:=]\s*["'](?P<version>[^"']+)["']"#;

/// Name of the capture group holding the version string.
const VERSION_GROUP: &str = "version";

static TOML_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*"(?P<version>[^"]+)""#).expect("invalid regex")
});

static DEFAULT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(DEFAULT_VERSION_PATTERN)
        .multi_line(true)
        .build()
        .expect("invalid regex")
});

/// Errors that can occur when updating version files.
#[derive(Debug, Error)]
pub enum FileUpdateError {
    /// File not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Failed to read or write the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the file or the version in it.
    #[error("failed to parse {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// Version not found in file.
    #[error("version not found in {0}")]
    VersionNotFound(String),

    /// The configured pattern does not compile or lacks a `version` group.
    #[error("invalid version pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileUpdateError>;

/// How the version string is found in a file.
enum Locator {
    Toml,
    Json,
    Pattern(Regex),
}

impl Locator {
    fn for_path(path: &Path, pattern: Option<&str>) -> FileResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let extension = path.extension().and_then(|e| e.to_str());

        match (filename, extension) {
            ("Cargo.toml", _) | (_, Some("toml")) => Ok(Self::Toml),
            ("package.json", _) | (_, Some("json")) => Ok(Self::Json),
            _ => match pattern {
                Some(pattern) => compile_pattern(pattern).map(Self::Pattern),
                None => Ok(Self::Pattern(DEFAULT_VERSION.clone())),
            },
        }
    }

    /// Returns the byte range of the version string, or a parse failure.
    fn find(&self, content: &str) -> Result<Option<Range<usize>>, String> {
        match self {
            Self::Toml => Ok(group_range(&TOML_VERSION, content)),
            Self::Pattern(regex) => Ok(group_range(regex, content)),
            Self::Json => find_json_version(content),
        }
    }
}

fn group_range(regex: &Regex, content: &str) -> Option<Range<usize>> {
    regex
        .captures(content)
        .and_then(|c| c.name(VERSION_GROUP))
        .map(|m| m.range())
}

/// Finds the top-level `"version"` value of a JSON document.
///
/// The document is validated with `serde_json` first, then scanned for the
/// key at depth one; keys inside nested objects or arrays are skipped.
fn find_json_version(content: &str) -> Result<Option<Range<usize>>, String> {
    let json: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let object = json
        .as_object()
        .ok_or_else(|| "not a JSON object".to_string())?;
    if !object
        .get(VERSION_GROUP)
        .is_some_and(serde_json::Value::is_string)
    {
        return Ok(None);
    }

    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut expect_key = false;
    let mut in_version = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(bytes, i + 1);
                if depth == 1 {
                    if expect_key {
                        in_version = &content[i + 1..end] == VERSION_GROUP;
                        expect_key = false;
                    } else if in_version {
                        return Ok(Some(i + 1..end));
                    }
                }
                i = end;
            }
            b'{' => {
                depth += 1;
                expect_key = depth == 1;
            }
            b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 1 => {
                expect_key = true;
                in_version = false;
            }
            _ => {}
        }
        i += 1;
    }

    Ok(None)
}

/// Returns the index of the closing quote of a string starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn compile_pattern(pattern: &str) -> FileResult<Regex> {
    let regex = RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|e| FileUpdateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

    if !regex.capture_names().flatten().any(|n| n == VERSION_GROUP) {
        return Err(FileUpdateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: format!("missing a capture group named `{VERSION_GROUP}`"),
        });
    }

    Ok(regex)
}

fn read_located(path: &Path, pattern: Option<&str>) -> FileResult<(String, Range<usize>)> {
    if !path.exists() {
        return Err(FileUpdateError::NotFound(path.display().to_string()));
    }

    let locator = Locator::for_path(path, pattern)?;
    let content = fs::read_to_string(path)?;

    let range = locator
        .find(&content)
        .map_err(|reason| FileUpdateError::ParseError {
            file: path.display().to_string(),
            reason,
        })?
        .ok_or_else(|| FileUpdateError::VersionNotFound(path.display().to_string()))?;

    Ok((content, range))
}

/// Updates the version in a file based on its type.
///
/// `pattern` only applies to files that are neither TOML nor JSON; without
/// one, [`DEFAULT_VERSION_PATTERN`] is used. Returns the version string that
/// was replaced. With `dry_run` the file is located and checked but not
/// written.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The pattern is invalid
/// - The file cannot be parsed or holds no version
/// - The file cannot be read or written
pub fn update_version_file(
    path: &Path,
    new_version: &Version,
    pattern: Option<&str>,
    dry_run: bool,
) -> FileResult<String> {
    let (mut content, range) = read_located(path, pattern)?;
    let previous = content[range.clone()].to_string();

    content.replace_range(range, &new_version.to_string());

    if dry_run {
        debug!(path = %path.display(), from = %previous, to = %new_version, "would update version file");
    } else {
        fs::write(path, content)?;
        info!(path = %path.display(), from = %previous, to = %new_version, "updated version file");
    }

    Ok(previous)
}

/// Reads the current version from a file.
///
/// Uses the same rules as [`update_version_file`].
///
/// # Errors
///
/// Returns an error if the version cannot be located or is not valid semver.
pub fn read_version_from_file(path: &Path, pattern: Option<&str>) -> FileResult<Version> {
    let (content, range) = read_located(path, pattern)?;

    Version::parse(&content[range]).map_err(|e| FileUpdateError::ParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}
