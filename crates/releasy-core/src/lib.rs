//! Core library for Releasy.
//!
//! Ties the note grouper, git access, version handling and hooks into a
//! release pipeline.

mod error;
mod files;
mod release;
mod version;

pub use error::{CoreError, CoreResult};
pub use files::{
    DEFAULT_VERSION_PATTERN, FileResult, FileUpdateError, read_version_from_file,
    update_version_file,
};
pub use release::{ReleaseManager, ReleaseOptions, ReleaseOutcome, ReleasePlan};
pub use version::{VersionManager, infer_bump};
