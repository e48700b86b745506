//! Raw commit type as retrieved from Git.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HASH_WIDTH;

/// A commit as retrieved from Git.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    /// The commit hash (SHA).
    pub hash: String,

    /// The full commit message (subject + body).
    pub message: String,

    /// The commit author name.
    pub author: String,

    /// The commit author email.
    pub email: String,

    /// The commit date.
    pub date: DateTime<Utc>,
}

impl RawCommit {
    /// Creates a new raw commit.
    #[must_use]
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            author: author.into(),
            email: email.into(),
            date,
        }
    }

    /// Returns the first line of the commit message (the subject).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Returns the short hash (first 7 characters).
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(HASH_WIDTH)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }

    /// Renders the commit as a one-line log entry (`<short hash> <subject>`).
    #[must_use]
    pub fn log_line(&self) -> String {
        format!("{} {}", self.short_hash(), self.subject())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_commit(hash: &str, message: &str) -> RawCommit {
        RawCommit::new(hash, message, "Test Author", "test@example.com", Utc::now())
    }

    #[test]
    fn test_new() {
        let now = Utc::now();
        let commit = RawCommit::new(
            "abc1234567890",
            "feat: add feature",
            "Test Author",
            "test@example.com",
            now,
        );

        assert_eq!(commit.hash, "abc1234567890");
        assert_eq!(commit.message, "feat: add feature");
        assert_eq!(commit.author, "Test Author");
        assert_eq!(commit.email, "test@example.com");
        assert_eq!(commit.date, now);
    }

    #[test]
    fn test_subject() {
        let commit = make_commit("abc1234567890", "feat: add new feature\n\nThis is the body");
        assert_eq!(commit.subject(), "feat: add new feature");
    }

    #[test]
    fn test_subject_empty() {
        let commit = make_commit("abc123", "");
        assert_eq!(commit.subject(), "");
    }

    #[test]
    fn test_subject_only_newlines() {
        let commit = make_commit("abc123", "\n\n\n");
        assert_eq!(commit.subject(), "");
    }

    #[test]
    fn test_short_hash() {
        let commit = make_commit("abc1234567890", "message");
        assert_eq!(commit.short_hash(), "abc1234");
    }

    #[test]
    fn test_short_hash_less_than_7() {
        let commit = make_commit("abc", "message");
        assert_eq!(commit.short_hash(), "abc");
    }

    #[test]
    fn test_short_hash_empty() {
        let commit = make_commit("", "message");
        assert_eq!(commit.short_hash(), "");
    }

    #[test]
    fn test_log_line() {
        let commit = make_commit("abc1234567890", "fix: null check\n\nlong body");
        assert_eq!(commit.log_line(), "abc1234 fix: null check");
    }

    #[test]
    fn test_log_line_parses_back() {
        let commit = make_commit("def5678901234", "feat: add login");
        let line = crate::CommitLine::parse(&commit.log_line()).unwrap();
        assert_eq!(line.hash, "def5678");
        assert_eq!(line.message, "feat: add login");
    }

    #[test]
    fn test_serialize_deserialize() {
        let commit = make_commit("abc123", "test message");
        let json = serde_json::to_string(&commit).unwrap();
        let deserialized: RawCommit = serde_json::from_str(&json).unwrap();
        assert_eq!(commit, deserialized);
    }
}
