//! Bearer-token helpers for tests.
//!
//! Tokens are minted with the real [`JwtKeys`], so requests built here travel
//! through the same guard as production traffic.

use soundcave_auth_types::guard::Identity;
use soundcave_auth_types::token::{DEFAULT_TOKEN_TTL_SECS, JwtKeys};
use soundcave_domain::id::UserId;
use soundcave_domain::user::Role;

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret-for-unit-tests-only";

/// Keys matching [`TEST_JWT_SECRET`] with the default validity window.
pub fn test_keys() -> JwtKeys {
    JwtKeys::new(TEST_JWT_SECRET, DEFAULT_TOKEN_TTL_SECS)
}

/// Configurable caller identity for test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl MockAuth {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self {
            user_id: UserId(user_id),
            email: format!("user{user_id}@example.com"),
            role,
        }
    }

    /// The identity the guard resolves for this caller.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.user_id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// `Authorization` header value signed with [`TEST_JWT_SECRET`].
    pub fn bearer(&self) -> String {
        let issued = test_keys()
            .issue(self.user_id, &self.email, self.role)
            .expect("sign test token");
        format!("Bearer {}", issued.token)
    }
}
