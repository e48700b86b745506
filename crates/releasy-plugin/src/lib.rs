//! Release hook system for Releasy.
//!
//! - [`Plugin`]: base trait naming a hook
//! - [`ReleaseHook`]: lifecycle callbacks run by the release pipeline
//! - [`ReleaseContext`]: state shared with every hook
//! - [`BumpType`]: which semver component a release increments

mod bump;
mod context;
mod error;
mod traits;

pub use bump::BumpType;
pub use context::ReleaseContext;
pub use error::{PluginError, PluginResult};
pub use traits::Plugin;
pub use traits::hook::ReleaseHook;
