use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use soundcave_auth_types::token::JwtKeys;

use crate::domain::password::PasswordHasher;
use crate::infra::db::{DbArtistRepository, DbFollowRepository, DbUserRepository};
use crate::infra::storage::LocalObjectStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub hasher: PasswordHasher,
    pub object_store: LocalObjectStore,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn artist_repo(&self) -> DbArtistRepository {
        DbArtistRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
