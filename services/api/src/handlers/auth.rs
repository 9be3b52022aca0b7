use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use soundcave_domain::user::Role;

use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase};
use crate::usecase::user::{CreateUserInput, CreateUserUseCase};

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Self-service sign-up. The role is always `user`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(CreateUserInput {
            full_name: body.full_name,
            email: body.email,
            password: body.password,
            phone: body.phone,
            role: Role::User,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    /// Seconds since UNIX epoch.
    pub expires_at: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        keys: state.jwt.clone(),
        hasher: state.hasher,
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        user: output.user.into(),
        token: output.token.token,
        expires_at: output.token.expires_at,
    }))
}
