//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Wire format: lowercase name (`"user"`, `"admin"`, `"premium"`, `"independent"`, `"label"`).
/// This is the only place a role string is turned into a role; every other layer
/// (token claims, request bodies, database rows) goes through [`Role::from_str`] or serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Premium,
    Independent,
    Label,
}

/// Returned when a string does not name a known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Admin,
        Role::Premium,
        Role::Independent,
        Role::Label,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Premium => "premium",
            Self::Independent => "independent",
            Self::Label => "label",
        }
    }

    /// Accounts with this role can accumulate followers.
    pub fn is_followable(self) -> bool {
        matches!(self, Self::Independent | Self::Label)
    }

    /// Accounts with this role may follow or unfollow others.
    ///
    /// Restricted to plain `user`; premium and admin accounts are excluded.
    pub fn can_follow(self) -> bool {
        self == Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;
