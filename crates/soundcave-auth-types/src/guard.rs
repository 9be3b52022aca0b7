//! Bearer-credential guard: presence check, token validation, identity
//! propagation and route-level role gating.

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use soundcave_domain::id::UserId;
use soundcave_domain::user::Role;

use crate::token::{JwtKeys, TokenError};

const BEARER_SCHEME: &str = "Bearer";

/// Caller identity resolved from a validated bearer token.
///
/// Extracting this in a handler makes the route require authentication.
/// The role is the one embedded at issuance; no database lookup is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Caller identity that additionally passed the admin role gate.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

/// Guard rejections. Each variant is a distinct, client-visible condition.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("invalid credential: {0}")]
    InvalidCredential(#[from] TokenError),
    #[error("forbidden: requires role {required}")]
    Forbidden { required: Role },
}

impl GuardError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::Forbidden { .. } => "FORBIDDEN",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

/// Split an `Authorization` header value into its token.
///
/// The value must be exactly `Bearer <token>`: two space-separated parts,
/// the literal scheme `Bearer`, and a non-empty token.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, GuardError> {
    let value = header.ok_or(GuardError::MissingCredential)?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(GuardError::MalformedCredential),
    }
}

/// Validate an `Authorization` header value and resolve the caller identity.
pub fn validate_credential(header: Option<&str>, keys: &JwtKeys) -> Result<Identity, GuardError> {
    let token = parse_bearer(header)?;
    let claims = keys.validate(token)?;
    let id = claims
        .sub
        .parse::<UserId>()
        .map_err(|_| GuardError::InvalidCredential(TokenError::Malformed))?;
    Ok(Identity {
        id,
        email: claims.email,
        role: claims.role,
    })
}

/// Require the identity to hold exactly `role`.
pub fn require_role(identity: &Identity, role: Role) -> Result<(), GuardError> {
    if identity.role == role {
        Ok(())
    } else {
        Err(GuardError::Forbidden { required: role })
    }
}

fn resolve_identity(parts: &mut Parts, keys: &JwtKeys) -> Result<Identity, GuardError> {
    if let Some(identity) = parts.extensions.get::<Identity>() {
        return Ok(identity.clone());
    }

    let header = match parts.headers.get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| GuardError::MalformedCredential)?),
    };

    let identity = validate_credential(header, keys).inspect_err(|e| {
        tracing::debug!(kind = e.kind(), reason = %e, "credential rejected");
    })?;
    parts.extensions.insert(identity.clone());
    Ok(identity)
}

impl<S> FromRequestParts<S> for Identity
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardError;

    // Resolve synchronously and hand back a 'static future; the header borrow
    // must not be captured across the await point.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = JwtKeys::from_ref(state);
        let result = resolve_identity(parts, &keys);
        async move { result }
    }
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = JwtKeys::from_ref(state);
        let result = resolve_identity(parts, &keys)
            .and_then(|identity| require_role(&identity, Role::Admin).map(|()| identity));
        async move { result.map(AdminIdentity) }
    }
}
