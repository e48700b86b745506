//! Release note grouping for Releasy.
//!
//! Turns a one-line commit log into categorized release notes:
//!
//! ```text
//! Changes since v1.2.0          <- header line, discarded
//! abc1234 feat: add login
//! def5678 fix: null check
//! 1234567 cleanup stuff
//! ```
//!
//! renders as
//!
//! ```text
//! feat
//! abc1234: add login
//! fix
//! def5678: null check
//! other
//! 1234567: cleanup stuff
//!
//! ```
//!
//! Grouping is a pure function of the log text; rendering writes to any sink.

mod notes;

pub use notes::{ReleaseNotes, write_release_notes};
