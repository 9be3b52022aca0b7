//! Follow relationship types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ArtistId, UserId};

/// Something a fan can follow: an independent/label account or an artist record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FollowTarget {
    User(UserId),
    Artist(ArtistId),
}

impl FollowTarget {
    /// Storage discriminator for the `follows.target_kind` column.
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::User(_) => TargetKind::User,
            Self::Artist(_) => TargetKind::Artist,
        }
    }

    /// Raw id within the target's kind.
    pub fn raw_id(&self) -> i64 {
        match self {
            Self::User(id) => id.0,
            Self::Artist(id) => id.0,
        }
    }

    /// `true` when the target is the fan's own account.
    pub fn is_self(&self, fan: UserId) -> bool {
        matches!(self, Self::User(id) if *id == fan)
    }
}

impl fmt::Display for FollowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.raw_id())
    }
}

/// Discriminates the two followable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    User,
    Artist,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Artist => "artist",
        }
    }
}
