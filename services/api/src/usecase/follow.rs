use soundcave_auth_types::guard::Identity;
use soundcave_domain::follow::FollowTarget;

use crate::domain::repository::{ArtistRepository, FollowRepository, UserRepository};
use crate::domain::types::{FollowOutcome, Followers};
use crate::error::ApiError;

/// Look up a follow target and return its display name.
///
/// With `require_followable`, a user target must hold a followable role.
/// Artist records are always followable.
async fn resolve_target<U, A>(
    users: &U,
    artists: &A,
    target: FollowTarget,
    require_followable: bool,
) -> Result<String, ApiError>
where
    U: UserRepository,
    A: ArtistRepository,
{
    match target {
        FollowTarget::User(id) => {
            let user = users
                .find_by_id(id)
                .await?
                .ok_or(ApiError::UserNotFound)?;
            if require_followable && !user.role.is_followable() {
                return Err(ApiError::NotFollowable);
            }
            Ok(user.full_name)
        }
        FollowTarget::Artist(id) => {
            let artist = artists
                .find_by_id(id)
                .await?
                .ok_or(ApiError::ArtistNotFound)?;
            Ok(artist.name)
        }
    }
}

fn ensure_can_follow(fan: &Identity) -> Result<(), ApiError> {
    if fan.role.can_follow() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── Follow ───────────────────────────────────────────────────────────────────

pub struct FollowUseCase<U: UserRepository, A: ArtistRepository, F: FollowRepository> {
    pub users: U,
    pub artists: A,
    pub follows: F,
}

impl<U: UserRepository, A: ArtistRepository, F: FollowRepository> FollowUseCase<U, A, F> {
    pub async fn execute(
        &self,
        fan: &Identity,
        target: FollowTarget,
    ) -> Result<FollowOutcome, ApiError> {
        ensure_can_follow(fan)?;
        if target.is_self(fan.id) {
            return Err(ApiError::SelfFollow);
        }
        let target_name = resolve_target(&self.users, &self.artists, target, true).await?;
        let total_follower = self
            .follows
            .follow(fan.id, target)
            .await?
            .ok_or(ApiError::AlreadyFollowing)?;
        tracing::info!(fan = %fan.id, %target, total_follower, "follow added");
        Ok(FollowOutcome {
            target,
            target_name,
            total_follower,
        })
    }
}

// ── Unfollow ─────────────────────────────────────────────────────────────────

pub struct UnfollowUseCase<U: UserRepository, A: ArtistRepository, F: FollowRepository> {
    pub users: U,
    pub artists: A,
    pub follows: F,
}

impl<U: UserRepository, A: ArtistRepository, F: FollowRepository> UnfollowUseCase<U, A, F> {
    pub async fn execute(
        &self,
        fan: &Identity,
        target: FollowTarget,
    ) -> Result<FollowOutcome, ApiError> {
        ensure_can_follow(fan)?;
        // A target that lost its followable role can still be unfollowed.
        let target_name = resolve_target(&self.users, &self.artists, target, false).await?;
        let total_follower = self
            .follows
            .unfollow(fan.id, target)
            .await?
            .ok_or(ApiError::NotFollowing)?;
        tracing::info!(fan = %fan.id, %target, total_follower, "follow removed");
        Ok(FollowOutcome {
            target,
            target_name,
            total_follower,
        })
    }
}

// ── ListFollowers ────────────────────────────────────────────────────────────

pub struct ListFollowersUseCase<U: UserRepository, A: ArtistRepository, F: FollowRepository> {
    pub users: U,
    pub artists: A,
    pub follows: F,
}

impl<U: UserRepository, A: ArtistRepository, F: FollowRepository> ListFollowersUseCase<U, A, F> {
    pub async fn execute(&self, target: FollowTarget) -> Result<Followers, ApiError> {
        let target_name = resolve_target(&self.users, &self.artists, target, false).await?;
        let fan_ids = self.follows.list_followers(target).await?;
        Ok(Followers {
            target,
            target_name,
            fan_ids,
        })
    }
}
