//! Version management.

use releasy_notes::ReleaseNotes;
use releasy_plugin::BumpType;
use semver::{BuildMetadata, Prerelease, Version};

/// Manages version operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionManager;

impl VersionManager {
    /// Creates a new version manager.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Bumps a version according to the bump type.
    ///
    /// Any real bump drops pre-release and build metadata.
    #[must_use]
    pub fn bump(&self, version: &Version, bump_type: BumpType) -> Version {
        let (major, minor, patch) = match bump_type {
            BumpType::None => return version.clone(),
            BumpType::Major => (version.major + 1, 0, 0),
            BumpType::Minor => (version.major, version.minor + 1, 0),
            BumpType::Patch => (version.major, version.minor, version.patch + 1),
        };

        Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Extracts the version from a tag name.
    #[must_use]
    pub fn from_tag(&self, tag: &str, prefix: &str) -> Option<Version> {
        tag.strip_prefix(prefix)
            .and_then(|v| Version::parse(v).ok())
    }
}

/// Infers the bump a set of release notes calls for.
///
/// Categories ending in `!` are breaking; otherwise the type before any
/// `(scope)` decides: `feat` is minor, `fix` and `perf` are patch. The
/// largest bump wins.
#[must_use]
pub fn infer_bump(notes: &ReleaseNotes) -> BumpType {
    notes
        .categories()
        .map(|category| category_bump(category.as_str()))
        .max()
        .unwrap_or_default()
}

fn category_bump(category: &str) -> BumpType {
    if category.ends_with('!') {
        return BumpType::Major;
    }

    let kind = category.split_once('(').map_or(category, |(kind, _)| kind);
    match kind {
        "feat" => BumpType::Minor,
        "fix" | "perf" => BumpType::Patch,
        _ => BumpType::None,
    }
}
