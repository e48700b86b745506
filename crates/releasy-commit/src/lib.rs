//! Commit types for Releasy.
//!
//! This crate provides the commit types used throughout Releasy:
//! - [`RawCommit`]: A commit as retrieved from Git
//! - [`CommitLine`]: One `<hash> <message>` line of a one-line commit log
//! - [`CommitEntry`] and [`Category`]: A log line after its category prefix is split off

mod line;
mod raw;

pub use line::{Category, CommitEntry, CommitLine, HASH_WIDTH, MalformedLine, SENTINEL_CATEGORY};
pub use raw::RawCommit;
