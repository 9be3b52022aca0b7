use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use soundcave_core::error::{error_response, internal_error_response};

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("user not found")]
    UserNotFound,
    #[error("artist not found")]
    ArtistNotFound,
    #[error("already following")]
    AlreadyFollowing,
    #[error("cannot follow yourself")]
    SelfFollow,
    #[error("target cannot be followed")]
    NotFollowable,
    #[error("not following")]
    NotFollowing,
    #[error("email already registered")]
    EmailAlreadyExists,
    #[error("invalid email or password")]
    InvalidLogin,
    #[error("password login is not available for this account")]
    PasswordLoginUnavailable,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ArtistNotFound => "ARTIST_NOT_FOUND",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::NotFollowable => "NOT_FOLLOWABLE",
            Self::NotFollowing => "NOT_FOLLOWING",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::InvalidLogin => "INVALID_LOGIN",
            Self::PasswordLoginUnavailable => "PASSWORD_LOGIN_UNAVAILABLE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound | Self::ArtistNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyFollowing | Self::SelfFollow | Self::EmailAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::NotFollowable | Self::NotFollowing | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidLogin | Self::PasswordLoginUnavailable => StatusCode::UNAUTHORIZED,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal(ref e) => internal_error_response(e),
            _ => error_response(self.status(), self.kind(), self.to_string()),
        }
    }
}
