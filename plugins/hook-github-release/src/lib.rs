//! GitHub Release hook.
//!
//! Publishes the release through the `gh` CLI once the tag exists, using the
//! rendered notes file as the release body.

use std::process::Command;
use std::time::Instant;

use releasy_plugin::{Plugin, PluginError, PluginResult, ReleaseContext, ReleaseHook};
use serde_json::Value;
use tracing::info;

/// Metadata key holding the URL printed by `gh release create`.
pub const RELEASE_URL_KEY: &str = "github_release_url";

/// GitHub Release hook.
pub struct GithubReleaseHook {
    program: String,
    draft: bool,
    prerelease: bool,
    assets: Vec<String>,
}

impl GithubReleaseHook {
    /// Creates a new GitHub Release hook.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "gh".to_string(),
            draft: false,
            prerelease: false,
            assets: Vec::new(),
        }
    }

    /// Creates release as draft.
    #[must_use]
    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// Marks release as prerelease.
    #[must_use]
    pub fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Sets assets to upload.
    #[must_use]
    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    /// Runs another executable instead of `gh`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Builds the `gh` arguments for a release.
    ///
    /// With `--verify-tag`, `gh` fails instead of creating a tag missing
    /// from the remote.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ConfigError`] if the notes have not been written.
    pub fn release_args(&self, ctx: &ReleaseContext) -> PluginResult<Vec<String>> {
        let notes_path = ctx.notes_path.as_ref().ok_or_else(|| {
            PluginError::ConfigError(format!("no notes file written for {}", ctx.tag))
        })?;

        let mut args = vec![
            "release".to_string(),
            "create".to_string(),
            ctx.tag.clone(),
            "--title".to_string(),
            ctx.tag.clone(),
            "--notes-file".to_string(),
            notes_path.display().to_string(),
            "--verify-tag".to_string(),
        ];
        if self.draft {
            args.push("--draft".to_string());
        }
        if self.prerelease {
            args.push("--prerelease".to_string());
        }
        args.extend(self.assets.iter().cloned());

        Ok(args)
    }
}

impl Default for GithubReleaseHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for GithubReleaseHook {
    fn name(&self) -> &'static str {
        "github-release"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "Publishes a GitHub Release with the release notes"
    }
}

impl ReleaseHook for GithubReleaseHook {
    fn on_post_tag(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
        if ctx.dry_run {
            info!(tag = %ctx.tag, draft = self.draft, "would create GitHub release");
            return Ok(());
        }

        let args = self.release_args(ctx)?;
        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&ctx.repo_path)
            .output()?;

        info!(
            tag = %ctx.tag,
            duration_ms = start.elapsed().as_millis(),
            success = output.status.success(),
            "gh release create"
        );

        if !output.status.success() {
            return Err(PluginError::ExecutionFailed(format!(
                "{} release create {} exited with {}: {}",
                self.program,
                ctx.tag,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !url.is_empty() {
            ctx.set_metadata(RELEASE_URL_KEY, Value::String(url));
        }

        Ok(())
    }
}
