use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use soundcave_auth_types::guard::Identity;
use soundcave_domain::follow::FollowTarget;
use soundcave_domain::id::{ArtistId, UserId};

use crate::domain::types::{FollowOutcome, Followers};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::follow::{FollowUseCase, ListFollowersUseCase, UnfollowUseCase};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FollowUserRequest {
    #[serde(default)]
    pub target_user_id: i64,
}

impl FollowUserRequest {
    fn target(&self) -> Result<FollowTarget, ApiError> {
        if self.target_user_id <= 0 {
            return Err(ApiError::InvalidInput("target_user_id is required".into()));
        }
        Ok(FollowTarget::User(UserId(self.target_user_id)))
    }
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub target_id: i64,
    pub target_name: String,
    pub total_follower: u64,
}

impl From<FollowOutcome> for FollowResponse {
    fn from(outcome: FollowOutcome) -> Self {
        Self {
            target_id: outcome.target.raw_id(),
            target_name: outcome.target_name,
            total_follower: outcome.total_follower,
        }
    }
}

/// Follower ids are string-encoded, oldest follower first.
#[derive(Serialize)]
pub struct FollowersResponse {
    pub target_id: i64,
    pub target_name: String,
    pub followers: Vec<String>,
    pub total_follower: u64,
}

impl From<Followers> for FollowersResponse {
    fn from(followers: Followers) -> Self {
        let total_follower = followers.total();
        Self {
            target_id: followers.target.raw_id(),
            target_name: followers.target_name,
            followers: followers.fan_ids.iter().map(UserId::to_string).collect(),
            total_follower,
        }
    }
}

async fn follow(
    state: &AppState,
    identity: &Identity,
    target: FollowTarget,
) -> Result<Json<FollowResponse>, ApiError> {
    let usecase = FollowUseCase {
        users: state.user_repo(),
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let outcome = usecase.execute(identity, target).await?;
    Ok(Json(outcome.into()))
}

async fn unfollow(
    state: &AppState,
    identity: &Identity,
    target: FollowTarget,
) -> Result<Json<FollowResponse>, ApiError> {
    let usecase = UnfollowUseCase {
        users: state.user_repo(),
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let outcome = usecase.execute(identity, target).await?;
    Ok(Json(outcome.into()))
}

async fn followers(
    state: &AppState,
    target: FollowTarget,
) -> Result<Json<FollowersResponse>, ApiError> {
    let usecase = ListFollowersUseCase {
        users: state.user_repo(),
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let followers = usecase.execute(target).await?;
    Ok(Json(followers.into()))
}

// ── POST /api/users/follow ───────────────────────────────────────────────────

pub async fn follow_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<FollowUserRequest>,
) -> Result<Json<FollowResponse>, ApiError> {
    follow(&state, &identity, body.target()?).await
}

// ── POST /api/users/unfollow ─────────────────────────────────────────────────

pub async fn unfollow_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<FollowUserRequest>,
) -> Result<Json<FollowResponse>, ApiError> {
    unfollow(&state, &identity, body.target()?).await
}

// ── POST /api/artists/{id}/follow ────────────────────────────────────────────

pub async fn follow_artist(
    identity: Identity,
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
) -> Result<Json<FollowResponse>, ApiError> {
    follow(&state, &identity, FollowTarget::Artist(artist_id)).await
}

// ── POST /api/artists/{id}/unfollow ──────────────────────────────────────────

pub async fn unfollow_artist(
    identity: Identity,
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
) -> Result<Json<FollowResponse>, ApiError> {
    unfollow(&state, &identity, FollowTarget::Artist(artist_id)).await
}

// ── GET /api/users/{id}/followers ────────────────────────────────────────────

pub async fn user_followers(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<FollowersResponse>, ApiError> {
    followers(&state, FollowTarget::User(user_id)).await
}

// ── GET /api/artists/{id}/followers ──────────────────────────────────────────

pub async fn artist_followers(
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
) -> Result<Json<FollowersResponse>, ApiError> {
    followers(&state, FollowTarget::Artist(artist_id)).await
}
