//! Version bump type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version bump type.
///
/// Variants are ordered by significance, so `max` picks the larger bump.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// No version bump needed.
    #[default]
    None,
    /// Patch version bump (bug fixes).
    Patch,
    /// Minor version bump (new features).
    Minor,
    /// Major version bump (breaking changes).
    Major,
}

impl BumpType {
    /// Returns true unless this is [`BumpType::None`].
    #[must_use]
    pub fn is_release(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::None => "none",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BumpType::Major.to_string(), "major");
        assert_eq!(BumpType::Minor.to_string(), "minor");
        assert_eq!(BumpType::Patch.to_string(), "patch");
        assert_eq!(BumpType::None.to_string(), "none");
    }

    #[test]
    fn test_ordering() {
        assert!(BumpType::Major > BumpType::Minor);
        assert!(BumpType::Minor > BumpType::Patch);
        assert!(BumpType::Patch > BumpType::None);
        assert!(BumpType::None < BumpType::Major);
    }

    #[test]
    fn test_max() {
        assert_eq!(BumpType::Patch.max(BumpType::Minor), BumpType::Minor);
        assert_eq!(BumpType::Major.max(BumpType::None), BumpType::Major);
        assert_eq!(BumpType::None.max(BumpType::None), BumpType::None);
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(BumpType::default(), BumpType::None);
        assert!(!BumpType::default().is_release());
        assert!(BumpType::Patch.is_release());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&BumpType::Major).unwrap(), "\"major\"");
        let bump: BumpType = serde_json::from_str("\"patch\"").unwrap();
        assert_eq!(bump, BumpType::Patch);
    }
}
