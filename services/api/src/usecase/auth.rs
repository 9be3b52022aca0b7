use anyhow::Context as _;

use soundcave_auth_types::token::{IssuedToken, JwtKeys};

use crate::domain::password::PasswordHasher;
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub user: User,
    pub token: IssuedToken,
}

/// Password login. Unknown email and wrong password are indistinguishable.
pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub keys: JwtKeys,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let email = input.email.trim();
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidLogin)?;
        let Some(ref hash) = user.password_hash else {
            return Err(ApiError::PasswordLoginUnavailable);
        };
        if !self.hasher.verify(&input.password, hash).await? {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(ApiError::InvalidLogin);
        }
        let token = self
            .keys
            .issue(user.id, &user.email, user.role)
            .context("sign access token")?;
        Ok(LoginOutput { user, token })
    }
}
