//! Release hook trait.

use super::Plugin;
use crate::{PluginResult, ReleaseContext};

/// Lifecycle hooks during the release process.
///
/// Called in this order:
/// 1. `pre_bump`: before the version file is rewritten
/// 2. `post_bump`: after the version file is rewritten
/// 3. `pre_commit`: before the release commit
/// 4. `pre_tag`: before the tag is created
/// 5. `post_tag`: after the tag is created and pushed
///
/// Every callback defaults to a no-op. Hooks still run during a dry run and
/// must check [`ReleaseContext::dry_run`] before changing anything.
pub trait ReleaseHook: Plugin {
    /// Called before the version file is rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the release.
    fn on_pre_bump(&self, _ctx: &mut ReleaseContext) -> PluginResult<()> {
        Ok(())
    }

    /// Called after the version file is rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the release.
    fn on_post_bump(&self, _ctx: &mut ReleaseContext) -> PluginResult<()> {
        Ok(())
    }

    /// Called before the release commit is created.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the release.
    fn on_pre_commit(&self, _ctx: &mut ReleaseContext) -> PluginResult<()> {
        Ok(())
    }

    /// Called before the tag is created.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the release.
    fn on_pre_tag(&self, _ctx: &mut ReleaseContext) -> PluginResult<()> {
        Ok(())
    }

    /// Called after the tag is created. Publishing happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails. The tag already exists by then.
    fn on_post_tag(&self, _ctx: &mut ReleaseContext) -> PluginResult<()> {
        Ok(())
    }
}
