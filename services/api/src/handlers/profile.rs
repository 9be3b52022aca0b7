use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
};
use bytes::Bytes;

use soundcave_auth_types::guard::Identity;

use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::profile::{UpdateProfileImageInput, UpdateProfileImageUseCase};
use crate::usecase::user::GetUserUseCase;

// ── GET /api/profile ─────────────────────────────────────────────────────────

pub async fn get_profile(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.id).await?;
    Ok(Json(user.into()))
}

// ── PUT /api/profile/image ───────────────────────────────────────────────────

/// Raw image upload; the body is the image and `Content-Type` names its format.
pub async fn update_profile_image(
    identity: Identity,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UserResponse>, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::UnsupportedMediaType)?
        .to_owned();
    let usecase = UpdateProfileImageUseCase {
        repo: state.user_repo(),
        store: state.object_store.clone(),
    };
    let user = usecase
        .execute(
            identity.id,
            UpdateProfileImageInput {
                content_type,
                bytes: body,
            },
        )
        .await?;
    Ok(Json(user.into()))
}
