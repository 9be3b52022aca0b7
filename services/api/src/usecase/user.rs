use soundcave_auth_types::guard::Identity;
use soundcave_domain::id::UserId;
use soundcave_domain::pagination::{Page, PageRequest};
use soundcave_domain::user::Role;

use crate::domain::password::PasswordHasher;
use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User, UserFilter, UserPatch};
use crate::error::ApiError;

fn required(field: &str, value: String) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn parse_role(value: &str) -> Result<Role, ApiError> {
    value
        .parse::<Role>()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// Drop blank optional fields so they are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Creates a password account. Serves both self-registration (role `user`)
/// and admin-issued accounts.
pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        let full_name = required("full_name", input.full_name)?;
        let email = required("email", input.email)?;
        if !email.contains('@') {
            return Err(ApiError::InvalidInput("email is not valid".into()));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailAlreadyExists);
        }
        let password_hash = self.hasher.hash(&input.password).await?;
        let user = self
            .repo
            .create(&NewUser {
                full_name,
                email,
                password_hash: Some(password_hash),
                phone: non_blank(input.phone),
                role: input.role,
            })
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersInput {
    pub role: Option<String>,
    pub search: Option<String>,
    pub page: PageRequest,
}

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, input: ListUsersInput) -> Result<Page<User>, ApiError> {
        let role = input.role.as_deref().map(parse_role).transpose()?;
        let filter = UserFilter {
            role,
            search: non_blank(input.search),
        };
        self.repo.list(&filter, input.page.clamped()).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    /// The owner or an admin may edit profile fields; only an admin may change the role.
    pub async fn execute(
        &self,
        caller: &Identity,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> Result<User, ApiError> {
        let is_admin = caller.role == Role::Admin;
        if caller.id != user_id && !is_admin {
            return Err(ApiError::Forbidden);
        }
        let role = match input.role {
            Some(_) if !is_admin => return Err(ApiError::Forbidden),
            Some(ref name) => Some(parse_role(name)?),
            None => None,
        };
        let full_name = input
            .full_name
            .map(|name| required("full_name", name))
            .transpose()?;
        let patch = UserPatch {
            full_name,
            phone: input.phone,
            location: input.location,
            bio: input.bio,
            profile_image: None,
            role,
        };
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("no fields to update".into()));
        }
        let user = self
            .repo
            .update(user_id, &patch)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if let Some(role) = role {
            tracing::info!(user_id = %user.id, %role, by = %caller.id, "role changed");
        }
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<(), ApiError> {
        if !self.repo.soft_delete(user_id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(%user_id, "user soft-deleted");
        Ok(())
    }
}
