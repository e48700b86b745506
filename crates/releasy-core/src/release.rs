//! Release orchestration.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use releasy_config::Config;
use releasy_git::{GitError, Repository};
use releasy_notes::ReleaseNotes;
use releasy_plugin::{BumpType, PluginResult, ReleaseContext, ReleaseHook};
use semver::Version;
use serde_json::Value;
use tracing::{debug, info};

use crate::{CoreError, CoreResult, VersionManager, infer_bump, update_version_file};

type HookCall = fn(&dyn ReleaseHook, &mut ReleaseContext) -> PluginResult<()>;

/// Options for a single release run.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseOptions {
    /// Forced bump type; inferred from the notes when `None`.
    pub bump: Option<BumpType>,

    /// Compute and report everything without touching disk or git.
    pub dry_run: bool,

    /// Push the release commit and tag.
    pub push: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            bump: None,
            dry_run: false,
            push: true,
        }
    }
}

impl ReleaseOptions {
    /// Forces a bump type.
    #[must_use]
    pub fn with_bump(mut self, bump: Option<BumpType>) -> Self {
        self.bump = bump;
        self
    }

    /// Sets the dry run flag.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets whether to push.
    #[must_use]
    pub fn push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }
}

/// What the next release would be.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Latest version tag, if any.
    pub previous_tag: Option<String>,

    /// Version of the latest tag, or 0.0.0.
    pub previous_version: Version,

    /// Version after the bump.
    pub next_version: Version,

    /// The bump applied.
    pub bump_type: BumpType,

    /// Tag the release will create.
    pub tag: String,

    /// Commits since the previous tag, grouped.
    pub notes: ReleaseNotes,
}

/// Result of a release run.
#[derive(Debug)]
pub struct ReleaseOutcome {
    /// The plan that was carried out.
    pub plan: ReleasePlan,

    /// Where the notes were (or would be) written.
    pub notes_path: PathBuf,

    /// Release commit hash; `None` on a dry run.
    pub commit: Option<String>,

    /// Whether the commit and tag were pushed.
    pub pushed: bool,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Metadata left by hooks.
    pub metadata: HashMap<String, Value>,
}

/// Manages the release process.
pub struct ReleaseManager {
    repo: Repository,
    config: Config,
    version_manager: VersionManager,
    hooks: Vec<Box<dyn ReleaseHook>>,
}

impl ReleaseManager {
    /// Creates a new release manager.
    #[must_use]
    pub fn new(repo: Repository, config: Config) -> Self {
        Self {
            repo,
            config,
            version_manager: VersionManager::new(),
            hooks: Vec::new(),
        }
    }

    /// Adds a release hook.
    #[must_use]
    pub fn with_hook(mut self, hook: Box<dyn ReleaseHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Returns the repository.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Returns the registered hooks.
    pub fn hooks(&self) -> &[Box<dyn ReleaseHook>] {
        &self.hooks
    }

    /// Groups the commits since the last tag and decides the next version.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoCommits`] if nothing was committed since the last
    /// tag and [`CoreError::NothingToRelease`] if the bump resolves to none.
    pub fn plan(&self, bump: Option<BumpType>) -> CoreResult<ReleasePlan> {
        let prefix = &self.config.version.tag_prefix;

        let previous_tag = self.repo.latest_version_tag(prefix)?;
        let previous_version = previous_tag
            .as_deref()
            .and_then(|t| self.version_manager.from_tag(t, prefix))
            .unwrap_or_else(|| Version::new(0, 0, 0));
        debug!(?previous_tag, %previous_version, "found previous version");

        let log = self.repo.oneline_log(previous_tag.as_deref())?;
        let notes = ReleaseNotes::from_log(&log);
        if notes.is_empty() {
            return Err(CoreError::NoCommits);
        }
        info!(count = notes.len(), "found commits since last release");

        let bump_type = bump.unwrap_or_else(|| infer_bump(&notes));
        if !bump_type.is_release() {
            return Err(CoreError::NothingToRelease);
        }

        let next_version = self.version_manager.bump(&previous_version, bump_type);
        let tag = format!("{prefix}{next_version}");
        info!(
            previous = %previous_version,
            next = %next_version,
            %bump_type,
            "calculated new version"
        );

        Ok(ReleasePlan {
            previous_tag,
            previous_version,
            next_version,
            bump_type,
            tag,
            notes,
        })
    }

    /// Executes a release.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition fails, a hook fails, or a file or
    /// git operation fails.
    pub fn release(&self, options: ReleaseOptions) -> CoreResult<ReleaseOutcome> {
        info!(dry_run = options.dry_run, "starting release process");
        let dry_run = options.dry_run;

        if self.config.git.require_clean && !self.repo.is_clean()? {
            return Err(CoreError::DirtyWorktree);
        }

        let plan = self.plan(options.bump)?;
        if self.repo.tag_exists(&plan.tag) {
            return Err(GitError::TagExists(plan.tag.clone()).into());
        }

        let mut ctx = ReleaseContext::new(
            self.repo.path(),
            plan.previous_version.clone(),
            plan.next_version.clone(),
            plan.bump_type,
            plan.tag.clone(),
        )
        .with_notes(plan.notes.render())
        .dry_run(dry_run);

        self.run_hooks("pre_bump", &mut ctx, |h, c| h.on_pre_bump(c))?;

        let version_path = self.repo.path().join(&self.config.version.file);
        update_version_file(
            &version_path,
            &plan.next_version,
            self.config.version.pattern.as_deref(),
            dry_run,
        )?;

        self.run_hooks("post_bump", &mut ctx, |h, c| h.on_post_bump(c))?;

        let notes_path = self.repo.path().join(&self.config.notes.output);
        if !dry_run {
            if let Some(parent) = notes_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&notes_path, &ctx.notes)?;
            ctx.notes_path = Some(notes_path.clone());
            info!(path = %notes_path.display(), "wrote release notes");
        }

        self.run_hooks("pre_commit", &mut ctx, |h, c| h.on_pre_commit(c))?;

        let commit = if dry_run {
            None
        } else {
            let message = self
                .config
                .git
                .commit_message_for(&plan.next_version.to_string());
            Some(self.repo.commit_paths(&[&version_path, &notes_path], &message)?)
        };

        self.run_hooks("pre_tag", &mut ctx, |h, c| h.on_pre_tag(c))?;

        if !dry_run {
            self.repo
                .create_tag(&plan.tag, &format!("Release {}", plan.next_version))?;
        }

        let pushed = options.push && !dry_run;
        if pushed {
            let branch = match &self.config.git.branch {
                Some(branch) => branch.clone(),
                None => self.repo.current_branch()?,
            };
            self.repo
                .push_with_tags(&self.config.git.remote, &branch)?;
        }

        self.run_hooks("post_tag", &mut ctx, |h, c| h.on_post_tag(c))?;

        info!(version = %plan.next_version, tag = %plan.tag, dry_run, "release completed");
        Ok(ReleaseOutcome {
            plan,
            notes_path,
            commit,
            pushed,
            dry_run,
            metadata: ctx.metadata,
        })
    }

    fn run_hooks(
        &self,
        stage: &'static str,
        ctx: &mut ReleaseContext,
        call: HookCall,
    ) -> CoreResult<()> {
        for hook in &self.hooks {
            debug!(hook = hook.name(), stage, "running hook");
            call(hook.as_ref(), ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository as Git2Repository, Signature};
    use releasy_plugin::{Plugin, PluginError};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const CARGO_TOML: &str = "[package]\nname = \"demo\"\nversion = \"0.0.0\"\n";

    fn init_repo() -> (TempDir, Git2Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Git2Repository::init(temp_dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        (temp_dir, repo)
    }

    fn commit_file(repo: &Git2Repository, name: &str, content: &str, message: &str) {
        let workdir = repo.workdir().unwrap();
        fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    fn project(messages: &[&str]) -> (TempDir, Git2Repository) {
        let (temp_dir, repo) = init_repo();
        commit_file(&repo, "Cargo.toml", CARGO_TOML, "chore: init");
        for (i, message) in messages.iter().enumerate() {
            commit_file(&repo, "src.txt", &i.to_string(), message);
        }
        (temp_dir, repo)
    }

    fn manager(dir: &TempDir) -> ReleaseManager {
        ReleaseManager::new(Repository::open(dir.path()).unwrap(), Config::default())
    }

    #[derive(Clone, Default)]
    struct RecordingHook {
        calls: Arc<Mutex<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingHook {
        fn record(&self, stage: &'static str, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{stage}:{}", ctx.dry_run));
            if self.fail_on == Some(stage) {
                return Err(PluginError::ExecutionFailed(format!("{stage} refused")));
            }
            ctx.set_metadata(stage, Value::Bool(true));
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Plugin for RecordingHook {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn version(&self) -> &'static str {
            "0.0.0"
        }
    }

    impl ReleaseHook for RecordingHook {
        fn on_pre_bump(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.record("pre_bump", ctx)
        }
        fn on_post_bump(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.record("post_bump", ctx)
        }
        fn on_pre_commit(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.record("pre_commit", ctx)
        }
        fn on_pre_tag(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.record("pre_tag", ctx)
        }
        fn on_post_tag(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            self.record("post_tag", ctx)
        }
    }

    /// Writes and stages an extra file before the release commit.
    struct StagingHook;

    impl Plugin for StagingHook {
        fn name(&self) -> &'static str {
            "staging"
        }
        fn version(&self) -> &'static str {
            "0.0.0"
        }
    }

    impl ReleaseHook for StagingHook {
        fn on_pre_commit(&self, ctx: &mut ReleaseContext) -> PluginResult<()> {
            fs::write(ctx.repo_path.join("CHANGELOG.md"), &ctx.notes)?;
            let repo = Git2Repository::open(&ctx.repo_path)
                .map_err(|e| PluginError::ExecutionFailed(e.to_string()))?;
            let mut index = repo
                .index()
                .map_err(|e| PluginError::ExecutionFailed(e.to_string()))?;
            index
                .add_path(Path::new("CHANGELOG.md"))
                .and_then(|()| index.write())
                .map_err(|e| PluginError::ExecutionFailed(e.to_string()))
        }
    }

    #[test]
    fn test_plan_first_release() {
        let (dir, _repo) = project(&["feat: add login", "fix: null check"]);

        let plan = manager(&dir).plan(None).unwrap();

        assert!(plan.previous_tag.is_none());
        assert_eq!(plan.previous_version, Version::new(0, 0, 0));
        assert_eq!(plan.next_version, Version::new(0, 1, 0));
        assert_eq!(plan.bump_type, BumpType::Minor);
        assert_eq!(plan.tag, "v0.1.0");
        assert_eq!(plan.notes.len(), 3);
    }

    #[test]
    fn test_plan_forced_bump() {
        let (dir, _repo) = project(&["docs: readme"]);

        let plan = manager(&dir).plan(Some(BumpType::Major)).unwrap();
        assert_eq!(plan.next_version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_plan_nothing_to_release() {
        let (dir, _repo) = project(&["docs: readme"]);

        assert!(matches!(
            manager(&dir).plan(None),
            Err(CoreError::NothingToRelease)
        ));
    }

    #[test]
    fn test_release_end_to_end() {
        let (dir, _repo) = project(&["feat: add login", "fix: null check"]);
        let hook = RecordingHook::default();
        let manager = manager(&dir).with_hook(Box::new(hook.clone()));

        let outcome = manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();

        assert_eq!(outcome.plan.tag, "v0.1.0");
        assert!(outcome.commit.is_some());
        assert!(!outcome.pushed);
        assert!(!outcome.dry_run);

        let cargo = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(cargo.contains("version = \"0.1.0\""));

        let notes = fs::read_to_string(dir.path().join("RELEASE_NOTES.md")).unwrap();
        assert!(notes.starts_with("chore\n"));
        assert!(notes.contains("feat\n"));
        assert!(notes.ends_with("\n\n"));
        assert_eq!(notes, outcome.plan.notes.render());

        let repo = manager.repo();
        assert!(repo.tag_exists("v0.1.0"));
        assert!(repo.is_clean().unwrap());
        let head = &repo.commits_since(None).unwrap()[0];
        assert_eq!(head.subject(), "Release 0.1.0");

        assert_eq!(
            hook.calls(),
            [
                "pre_bump:false",
                "post_bump:false",
                "pre_commit:false",
                "pre_tag:false",
                "post_tag:false"
            ]
        );
        assert_eq!(outcome.metadata.len(), 5);
    }

    #[test]
    fn test_release_dry_run_writes_nothing() {
        let (dir, _repo) = project(&["feat: add login"]);
        let hook = RecordingHook::default();
        let manager = manager(&dir).with_hook(Box::new(hook.clone()));

        let outcome = manager
            .release(ReleaseOptions::default().dry_run(true))
            .unwrap();

        assert!(outcome.dry_run);
        assert!(outcome.commit.is_none());
        assert!(!outcome.pushed);
        assert_eq!(outcome.plan.tag, "v0.1.0");
        assert_eq!(
            fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(),
            CARGO_TOML
        );
        assert!(!dir.path().join("RELEASE_NOTES.md").exists());
        assert!(!manager.repo().tag_exists("v0.1.0"));
        assert!(hook.calls().iter().all(|c| c.ends_with(":true")));
        assert_eq!(hook.calls().len(), 5);
    }

    #[test]
    fn test_release_twice_has_no_commits() {
        let (dir, _repo) = project(&["fix: crash"]);
        let manager = manager(&dir);

        manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();
        let second = manager.release(ReleaseOptions::default().push(false));

        assert!(matches!(second, Err(CoreError::NoCommits)));
    }

    #[test]
    fn test_release_continues_from_tag() {
        let (dir, repo) = project(&["feat: first"]);
        let manager = manager(&dir);
        manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();

        drop(repo);
        let repo = Git2Repository::open(dir.path()).unwrap();
        commit_file(&repo, "src.txt", "more", "fix: follow-up");
        let outcome = manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();

        assert_eq!(outcome.plan.previous_tag.as_deref(), Some("v0.1.0"));
        assert_eq!(outcome.plan.tag, "v0.1.1");
        assert_eq!(outcome.plan.notes.len(), 1);
    }

    #[test]
    fn test_release_commit_includes_files_staged_by_hooks() {
        let (dir, _repo) = project(&["feat: first"]);
        let manager = manager(&dir).with_hook(Box::new(StagingHook));

        // The first release primes the manager's index before the hook runs again
        manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();
        let repo = Git2Repository::open(dir.path()).unwrap();
        commit_file(&repo, "src.txt", "more", "fix: follow-up");
        manager
            .release(ReleaseOptions::default().push(false))
            .unwrap();

        let head_tree = repo.head().unwrap().peel_to_tree().unwrap();
        assert!(head_tree.get_name("CHANGELOG.md").is_some());
        assert!(manager.repo().is_clean().unwrap());
        assert!(manager.repo().tag_exists("v0.1.1"));
    }

    #[test]
    fn test_release_refuses_dirty_worktree() {
        let (dir, _repo) = project(&["feat: add login"]);
        fs::write(dir.path().join("scratch.txt"), "wip").unwrap();

        assert!(matches!(
            manager(&dir).release(ReleaseOptions::default()),
            Err(CoreError::DirtyWorktree)
        ));
    }

    #[test]
    fn test_release_allows_dirty_worktree_when_configured() {
        let (dir, _repo) = project(&["feat: add login"]);
        fs::write(dir.path().join("scratch.txt"), "wip").unwrap();

        let mut config = Config::default();
        config.git.require_clean = false;
        let manager = ReleaseManager::new(Repository::open(dir.path()).unwrap(), config);

        assert!(manager.release(ReleaseOptions::default().dry_run(true)).is_ok());
    }

    #[test]
    fn test_failing_hook_aborts_before_bump() {
        let (dir, _repo) = project(&["feat: add login"]);
        let hook = RecordingHook {
            fail_on: Some("pre_bump"),
            ..RecordingHook::default()
        };
        let manager = manager(&dir).with_hook(Box::new(hook.clone()));

        let result = manager.release(ReleaseOptions::default().push(false));

        assert!(matches!(result, Err(CoreError::Plugin(_))));
        assert_eq!(hook.calls(), ["pre_bump:false"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(),
            CARGO_TOML
        );
    }

    #[test]
    fn test_release_pushes_to_remote() {
        let (dir, repo) = project(&["feat: add login"]);
        let remote_dir = TempDir::new().unwrap();
        Git2Repository::init_bare(remote_dir.path()).unwrap();
        repo.remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        let outcome = manager(&dir).release(ReleaseOptions::default()).unwrap();

        assert!(outcome.pushed);
        let remote = Git2Repository::open_bare(remote_dir.path()).unwrap();
        assert!(remote.find_reference("refs/tags/v0.1.0").is_ok());
    }
}
