//! Entity and fragment vocabulary
//!
//! Wire names are the camelCase keys used by the catalog API payloads.
//! Entity kinds also accept their kebab-case CLI spelling.

use crate::error::MergeError;
use std::fmt;
use std::str::FromStr;

/// Entities that can be assembled from fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Album release with details, user details, artists and tracks
    AlbumRelease,
}

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[EntityKind::AlbumRelease];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::AlbumRelease => "albumRelease",
        }
    }

    /// Kebab-case name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            EntityKind::AlbumRelease => "album-release",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s || kind.cli_name() == s)
            .ok_or_else(|| MergeError::UnsupportedKind(s.to_string()))
    }
}

/// Fragment kinds known to the built-in schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    AlbumRelease,
    AlbumReleaseDetail,
    AlbumReleaseUserDetail,
    Artist,
    Track,
    TrackUserDetail,
}

impl FragmentKind {
    pub const ALL: &'static [FragmentKind] = &[
        FragmentKind::AlbumRelease,
        FragmentKind::AlbumReleaseDetail,
        FragmentKind::AlbumReleaseUserDetail,
        FragmentKind::Artist,
        FragmentKind::Track,
        FragmentKind::TrackUserDetail,
    ];

    /// Fragment key as it appears in payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::AlbumRelease => "albumRelease",
            FragmentKind::AlbumReleaseDetail => "albumReleaseDetail",
            FragmentKind::AlbumReleaseUserDetail => "albumReleaseUserDetail",
            FragmentKind::Artist => "artist",
            FragmentKind::Track => "track",
            FragmentKind::TrackUserDetail => "trackUserDetail",
        }
    }

    pub fn from_key(key: &str) -> Option<FragmentKind> {
        FragmentKind::ALL.iter().copied().find(|kind| kind.as_str() == key)
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FragmentKind> for String {
    fn from(kind: FragmentKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_accepts_wire_and_cli_names() {
        assert_eq!("albumRelease".parse::<EntityKind>().unwrap(), EntityKind::AlbumRelease);
        assert_eq!("album-release".parse::<EntityKind>().unwrap(), EntityKind::AlbumRelease);
        assert_eq!(
            "playlist".parse::<EntityKind>().unwrap_err(),
            MergeError::UnsupportedKind("playlist".to_string())
        );
    }

    #[test]
    fn test_fragment_kind_keys() {
        for kind in FragmentKind::ALL {
            assert_eq!(FragmentKind::from_key(kind.as_str()), Some(*kind));
        }
        assert_eq!(FragmentKind::from_key("lyrics"), None);
    }
}
