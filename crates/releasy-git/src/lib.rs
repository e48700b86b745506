//! Git abstraction layer for Releasy.
//!
//! This crate provides Git operations:
//! - Tag lookup and creation
//! - Commit retrieval and one-line logs
//! - Committing release changes and pushing them

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::Repository;
