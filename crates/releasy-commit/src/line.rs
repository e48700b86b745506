//! One-line commit log records.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the abbreviated hash at the start of every log line.
pub const HASH_WIDTH: usize = 7;

/// Category for messages without a `category: ` prefix.
pub const SENTINEL_CATEGORY: &str = "other";

/// Separator between a category prefix and the description.
const CATEGORY_SEPARATOR: &str = ": ";

/// A line shorter than [`HASH_WIDTH`] characters.
///
/// Carries the degraded record (whole line as hash, empty message) so callers
/// can keep going instead of dropping the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed log line {:?}: shorter than {} characters", .degraded.hash, HASH_WIDTH)]
pub struct MalformedLine {
    degraded: CommitLine,
}

impl MalformedLine {
    /// Returns the degraded record for the line.
    #[must_use]
    pub fn into_degraded(self) -> CommitLine {
        self.degraded
    }
}

/// A `<hash><separator><message>` line from a one-line commit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitLine {
    /// The abbreviated commit hash.
    pub hash: String,

    /// Everything after the hash and its separator.
    pub message: String,
}

impl CommitLine {
    /// Creates a commit line from its parts.
    #[must_use]
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
        }
    }

    /// Parses a log line.
    ///
    /// The first [`HASH_WIDTH`] characters are the hash, the next character is
    /// skipped as the separator, and the rest is the message. A line of exactly
    /// [`HASH_WIDTH`] characters has an empty message.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLine`] if the line is shorter than [`HASH_WIDTH`]
    /// characters. The error holds the whole line as hash and an empty message.
    pub fn parse(line: &str) -> Result<Self, MalformedLine> {
        let Some((split, _)) = line.char_indices().nth(HASH_WIDTH) else {
            let whole = Self::new(line, "");
            if line.chars().count() < HASH_WIDTH {
                return Err(MalformedLine { degraded: whole });
            }
            return Ok(whole);
        };

        let (hash, rest) = line.split_at(split);
        let mut rest = rest.chars();
        rest.next(); // separator

        Ok(Self::new(hash, rest.as_str()))
    }

    /// Splits the message into its category and entry.
    ///
    /// Only the first `": "` is significant; later occurrences stay in the
    /// description.
    #[must_use]
    pub fn categorize(&self) -> (Category, CommitEntry) {
        match self.message.split_once(CATEGORY_SEPARATOR) {
            Some((prefix, rest)) => (
                Category::from_prefix(prefix),
                CommitEntry::new(&self.hash, rest),
            ),
            None => (Category::other(), CommitEntry::new(&self.hash, &self.message)),
        }
    }
}

/// A grouping key derived from a commit message prefix.
///
/// Always lower-case, so ordering categories is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Creates a category from a message prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Self {
        Self(prefix.to_lowercase())
    }

    /// Returns the sentinel category.
    #[must_use]
    pub fn other() -> Self {
        Self(SENTINEL_CATEGORY.to_string())
    }

    /// Returns true for the sentinel category.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.0 == SENTINEL_CATEGORY
    }

    /// Returns the category name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commit hash with its category prefix stripped from the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// The abbreviated commit hash.
    pub hash: String,

    /// The message without its category prefix.
    pub description: String,
}

impl CommitEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(hash: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for CommitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.hash, self.description)
    }
}
