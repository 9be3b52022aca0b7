#![allow(async_fn_in_trait)]

use std::collections::HashMap;

use bytes::Bytes;

use soundcave_domain::follow::{FollowTarget, TargetKind};
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::pagination::{Page, PageRequest};

use crate::domain::types::{
    Artist, ArtistPatch, NewArtist, NewUser, User, UserFilter, UserPatch,
};
use crate::error::ApiError;

/// Repository for accounts. Lookups never return soft-deleted rows.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Insert a user. A taken email yields [`ApiError::EmailAlreadyExists`].
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;

    /// Apply a patch. Returns `None` when the user does not exist.
    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<Option<User>, ApiError>;

    /// Mark a user deleted. Returns `true` if a live row was marked.
    async fn soft_delete(&self, id: UserId) -> Result<bool, ApiError>;

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, ApiError>;
}

/// Repository for artist records. Lookups never return soft-deleted rows.
pub trait ArtistRepository: Send + Sync {
    async fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, ApiError>;
    async fn create(&self, artist: &NewArtist) -> Result<Artist, ApiError>;

    /// Apply a patch. Returns `None` when the artist does not exist.
    async fn update(&self, id: ArtistId, patch: &ArtistPatch)
    -> Result<Option<Artist>, ApiError>;

    /// Mark an artist deleted. Returns `true` if a live row was marked.
    async fn soft_delete(&self, id: ArtistId) -> Result<bool, ApiError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Artist>, ApiError>;
}

/// Follow edges between a fan and a target.
///
/// Mutations are atomic with the count they return: the edge change and the
/// `count(*)` happen in one transaction, and the uniqueness of
/// (fan, target kind, target id) is enforced by the store.
pub trait FollowRepository: Send + Sync {
    /// Insert the edge if absent. `None` when it already existed.
    ///
    /// The target row is re-read and share-locked in the same transaction, so a
    /// target deleted or demoted since the caller looked it up yields
    /// [`ApiError::UserNotFound`], [`ApiError::ArtistNotFound`] or
    /// [`ApiError::NotFollowable`] instead of a new edge.
    async fn follow(&self, fan: UserId, target: FollowTarget) -> Result<Option<u64>, ApiError>;

    /// Delete the edge if present. `None` when it did not exist.
    async fn unfollow(&self, fan: UserId, target: FollowTarget)
    -> Result<Option<u64>, ApiError>;

    async fn count(&self, target: FollowTarget) -> Result<u64, ApiError>;

    /// Follower counts for many targets of one kind. Targets without edges are absent.
    async fn count_many(
        &self,
        kind: TargetKind,
        ids: &[i64],
    ) -> Result<HashMap<i64, u64>, ApiError>;

    /// Fan ids, oldest edge first.
    async fn list_followers(&self, target: FollowTarget) -> Result<Vec<UserId>, ApiError>;
}

/// Minimal object storage contract.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, ApiError>;

    async fn delete(&self, key: &str) -> Result<(), ApiError>;

    /// Recover the key of an object this store published at `url`.
    fn key_for_url(&self, url: &str) -> Option<String>;
}
