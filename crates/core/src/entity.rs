//! Entity kinds of the production hierarchy.
//!
//! Versions and notes reference their parent polymorphically through a
//! `(type, id)` pair; [`EntityKind`] is the typed form of the `type` half.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A node type in `Project → Episode → Sequence → Shot/Asset → Version`,
/// plus playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Episode,
    Sequence,
    Shot,
    Asset,
    Version,
    Playlist,
}

/// Kinds a version may belong to.
pub const VERSIONABLE_KINDS: &[EntityKind] = &[
    EntityKind::Project,
    EntityKind::Episode,
    EntityKind::Sequence,
    EntityKind::Shot,
    EntityKind::Asset,
];

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::Project,
        EntityKind::Episode,
        EntityKind::Sequence,
        EntityKind::Shot,
        EntityKind::Asset,
        EntityKind::Version,
        EntityKind::Playlist,
    ];

    /// Wire and database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Episode => "episode",
            EntityKind::Sequence => "sequence",
            EntityKind::Shot => "shot",
            EntityKind::Asset => "asset",
            EntityKind::Version => "version",
            EntityKind::Playlist => "playlist",
        }
    }

    /// Human label used in `NotFound` errors.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Episode => "Episode",
            EntityKind::Sequence => "Sequence",
            EntityKind::Shot => "Shot",
            EntityKind::Asset => "Asset",
            EntityKind::Version => "Version",
            EntityKind::Playlist => "Playlist",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Episode => "episodes",
            EntityKind::Sequence => "sequences",
            EntityKind::Shot => "shots",
            EntityKind::Asset => "assets",
            EntityKind::Version => "versions",
            EntityKind::Playlist => "playlists",
        }
    }

    pub fn is_versionable(self) -> bool {
        VERSIONABLE_KINDS.contains(&self)
    }

    /// Parse a kind that versions may attach to.
    pub fn parse_versionable(value: &str) -> Result<Self, CoreError> {
        let kind: EntityKind = value.parse()?;
        if kind.is_versionable() {
            Ok(kind)
        } else {
            Err(CoreError::Validation(format!(
                "Versions cannot be attached to '{value}'. Must be one of: {}",
                VERSIONABLE_KINDS
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid entity type '{s}'. Must be one of: {}",
                    EntityKind::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}
