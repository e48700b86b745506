//! Git repository wrapper.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use chrono::{TimeZone, Utc};
use git2::{Repository as Git2Repo, StatusOptions};
use releasy_commit::RawCommit;
use tracing::{debug, info};

use crate::{GitError, GitResult};

/// A Git repository wrapper.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Discovers the repository from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover() -> GitResult<Self> {
        let inner = Git2Repo::discover(".")?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Returns all tags in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if tags cannot be read.
    pub fn tags(&self) -> GitResult<Vec<String>> {
        let tags = self.inner.tag_names(None)?;
        Ok(tags.iter().flatten().map(String::from).collect())
    }

    /// Returns true if a tag with this name exists.
    #[must_use]
    pub fn tag_exists(&self, name: &str) -> bool {
        self.inner
            .find_reference(&format!("refs/tags/{name}"))
            .is_ok()
    }

    /// Returns commits since the given tag, newest first.
    ///
    /// If tag is `None`, returns all commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag does not exist or commits cannot be read.
    pub fn commits_since(&self, tag: Option<&str>) -> GitResult<Vec<RawCommit>> {
        let mut revwalk = self.inner.revwalk()?;
        revwalk.push_head()?;

        if let Some(tag_name) = tag {
            let tag_commit = self
                .inner
                .resolve_reference_from_short_name(tag_name)
                .and_then(|r| r.peel_to_commit())
                .map_err(|_| GitError::TagNotFound(tag_name.to_string()))?;
            revwalk.hide(tag_commit.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.inner.find_commit(oid)?;

            let message = commit.message().unwrap_or("").to_string();
            let author = commit.author();
            let time = commit.time();

            commits.push(RawCommit::new(
                oid.to_string(),
                message,
                author.name().unwrap_or("Unknown"),
                author.email().unwrap_or(""),
                Utc.timestamp_opt(time.seconds(), 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            ));
        }

        debug!(count = commits.len(), since = ?tag, "read commits");
        Ok(commits)
    }

    /// Returns a one-line log of the commits since the given tag.
    ///
    /// The first line is a header naming the starting point; each following
    /// line is `<short hash> <subject>`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if commits cannot be read.
    pub fn oneline_log(&self, tag: Option<&str>) -> GitResult<String> {
        let commits = self.commits_since(tag)?;

        let mut log = match tag {
            Some(tag) => format!("Changes since {tag}\n"),
            None => "Changes since initial commit\n".to_string(),
        };
        for commit in &commits {
            log.push_str(&commit.log_line());
            log.push('\n');
        }

        Ok(log)
    }

    /// Returns the latest tag matching a version pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if tags cannot be read.
    pub fn latest_version_tag(&self, prefix: &str) -> GitResult<Option<String>> {
        let tags = self.tags()?;

        let mut version_tags: Vec<_> = tags
            .into_iter()
            .filter_map(|t| {
                let version_str = t.strip_prefix(prefix)?;
                semver::Version::parse(version_str).ok().map(|v| (t, v))
            })
            .collect();

        // Sort by version descending
        version_tags.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(version_tags.into_iter().next().map(|(tag, _)| tag))
    }

    /// Returns true if there are no modified, staged, or untracked files.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be read.
    pub fn is_clean(&self) -> GitResult<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(true);

        let statuses = self.inner.statuses(Some(&mut opts))?;
        Ok(statuses.is_empty())
    }

    /// Returns the short name of the checked out branch.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD is detached or unborn.
    pub fn current_branch(&self) -> GitResult<String> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }
        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Stages the given paths and commits them on HEAD.
    ///
    /// Paths are relative to the repository root; absolute paths inside the
    /// working directory are accepted too. Returns the new commit hash.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    pub fn commit_paths<P: AsRef<Path>>(&self, paths: &[P], message: &str) -> GitResult<String> {
        let mut index = self.inner.index()?;
        // Pick up anything staged by other writers since the last read.
        index.read(false)?;
        for path in paths {
            let path = path.as_ref();
            let relative = path.strip_prefix(self.path()).unwrap_or(path);
            index.add_path(relative)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;
        let sig = self.inner.signature()?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        info!(commit = %oid, message, "created commit");
        Ok(oid.to_string())
    }

    /// Creates a new annotated tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag exists or cannot be created.
    pub fn create_tag(&self, name: &str, message: &str) -> GitResult<()> {
        if self.tag_exists(name) {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.inner.head()?;
        let commit = head.peel_to_commit()?;
        let sig = self.inner.signature()?;

        self.inner
            .tag(name, commit.as_object(), &sig, message, false)?;

        info!(tag = name, "created tag");
        Ok(())
    }

    /// Pushes a branch and its annotated tags with the git CLI.
    ///
    /// Shells out so the user's credential helpers and SSH agent apply.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run or exits unsuccessfully.
    pub fn push_with_tags(&self, remote: &str, branch: &str) -> GitResult<()> {
        let start = Instant::now();
        let output = Command::new("git")
            .args(["push", "--follow-tags", remote, branch])
            .current_dir(self.path())
            .output()?;

        info!(
            remote,
            branch,
            duration_ms = start.elapsed().as_millis(),
            success = output.status.success(),
            "git push with tags"
        );

        if !output.status.success() {
            return Err(GitError::PushFailed {
                remote: remote.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
