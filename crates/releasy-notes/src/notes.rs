//! Categorized release notes.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use releasy_commit::{Category, CommitEntry, CommitLine, RawCommit};
use tracing::{debug, warn};

/// Commit entries grouped by category.
///
/// Categories iterate in ascending order of their lower-cased name; entries
/// keep the order in which their lines were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotes {
    groups: BTreeMap<Category, Vec<CommitEntry>>,
    malformed: usize,
}

impl ReleaseNotes {
    /// Creates empty release notes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups a one-line commit log.
    ///
    /// The first line is the log command's header and is discarded.
    #[must_use]
    pub fn from_log(log: &str) -> Self {
        let notes = Self::from_lines(log.lines().skip(1));
        debug!(
            entries = notes.len(),
            categories = notes.groups.len(),
            malformed = notes.malformed,
            "grouped commit log"
        );
        notes
    }

    /// Groups log lines. No header is skipped.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut notes = Self::new();
        for line in lines {
            notes.push_line(line);
        }
        notes
    }

    /// Groups commits read from the repository.
    #[must_use]
    pub fn from_commits(commits: &[RawCommit]) -> Self {
        let mut notes = Self::new();
        for commit in commits {
            notes.push_line(&commit.log_line());
        }
        notes
    }

    /// Adds one log line to its category.
    ///
    /// Lines shorter than the hash width are kept under the sentinel category
    /// with an empty description.
    pub fn push_line(&mut self, line: &str) {
        let parsed = CommitLine::parse(line).unwrap_or_else(|err| {
            warn!(%err, "keeping malformed log line with empty description");
            self.malformed += 1;
            err.into_degraded()
        });

        let (category, entry) = parsed.categorize();
        self.groups.entry(category).or_default().push(entry);
    }

    /// Returns the total number of entries across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns how many lines were shorter than the hash width.
    #[must_use]
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Returns the categories in output order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.groups.keys()
    }

    /// Returns the entries of a category, in log order.
    #[must_use]
    pub fn entries(&self, category: &str) -> &[CommitEntry] {
        self.groups
            .get(&Category::from_prefix(category))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over categories and their entries in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[CommitEntry])> {
        self.groups
            .iter()
            .map(|(category, entries)| (category, entries.as_slice()))
    }

    /// Writes the report: each category name followed by its
    /// `<hash>: <description>` lines, then one blank line.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn write_to<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        for (category, entries) in &self.groups {
            writeln!(sink, "{category}")?;
            for entry in entries {
                writeln!(sink, "{entry}")?;
            }
        }
        writeln!(sink)
    }

    /// Writes the report to an I/O sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn write_io<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.render().as_bytes())
    }

    /// Renders the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        _ = self.write_to(&mut output);
        output
    }
}

impl fmt::Display for ReleaseNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Groups a one-line commit log and writes the report to `sink`.
///
/// Returns the grouped notes so callers can inspect them.
///
/// # Errors
///
/// Returns an error if writing to the sink fails.
pub fn write_release_notes<W: io::Write>(log: &str, sink: &mut W) -> io::Result<ReleaseNotes> {
    let notes = ReleaseNotes::from_log(log);
    notes.write_io(sink)?;
    Ok(notes)
}
