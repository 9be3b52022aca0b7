use chrono::{DateTime, Utc};

use soundcave_domain::follow::FollowTarget;
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::user::Role;

/// Account record. Soft-deleted accounts are never materialized.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    /// bcrypt hash; `None` for accounts created through a third-party identity provider.
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

/// Partial profile update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.bio.is_none()
            && self.profile_image.is_none()
            && self.role.is_none()
    }
}

/// Filters for the user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Case-insensitive substring over full name and email.
    pub search: Option<String>,
}

/// Artist or label profile that is not itself a login.
#[derive(Debug, Clone)]
pub struct Artist {
    pub id: ArtistId,
    pub ref_user_id: Option<UserId>,
    pub name: String,
    pub bio: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArtist {
    pub ref_user_id: Option<UserId>,
    pub name: String,
    pub bio: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

/// Partial artist update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ArtistPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.genre.is_none()
            && self.country.is_none()
            && self.debut_year.is_none()
            && self.website.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

/// Result of a successful follow or unfollow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowOutcome {
    pub target: FollowTarget,
    pub target_name: String,
    pub total_follower: u64,
}

/// A target's follower set, oldest edge first.
#[derive(Debug, Clone)]
pub struct Followers {
    pub target: FollowTarget,
    pub target_name: String,
    pub fan_ids: Vec<UserId>,
}

impl Followers {
    pub fn total(&self) -> u64 {
        self.fan_ids.len() as u64
    }
}
