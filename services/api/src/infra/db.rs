use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel as _, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, Func, OnConflict},
};

use soundcave_api_schema::{artists, follows, users};
use soundcave_core::sea_ext::Paged as _;
use soundcave_domain::follow::{FollowTarget, TargetKind};
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::pagination::{Page, PageMeta, PageRequest};
use soundcave_domain::user::Role;

use crate::domain::repository::{ArtistRepository, FollowRepository, UserRepository};
use crate::domain::types::{
    Artist, ArtistPatch, NewArtist, NewUser, User, UserFilter, UserPatch,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn find_live(&self, id: UserId) -> Result<Option<users::Model>, ApiError> {
        let model = users::Entity::find_by_id(id.0)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model)
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        self.find_live(id).await?.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let now = Utc::now();
        let result = users::ActiveModel {
            full_name: Set(user.full_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone: Set(user.phone.clone()),
            location: Set(None),
            bio: Set(None),
            profile_image: Set(None),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => user_from_model(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(ApiError::EmailAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<Option<User>, ApiError> {
        let Some(model) = self.find_live(id).await? else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref full_name) = patch.full_name {
            am.full_name = Set(full_name.clone());
        }
        if let Some(ref phone) = patch.phone {
            am.phone = Set(Some(phone.clone()));
        }
        if let Some(ref location) = patch.location {
            am.location = Set(Some(location.clone()));
        }
        if let Some(ref bio) = patch.bio {
            am.bio = Set(Some(bio.clone()));
        }
        if let Some(ref profile_image) = patch.profile_image {
            am.profile_image = Set(Some(profile_image.clone()));
        }
        if let Some(role) = patch.role {
            am.role = Set(role.as_str().to_owned());
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user")?;
        user_from_model(model).map(Some)
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, ApiError> {
        let now = Utc::now();
        let result = users::Entity::update_many()
            .col_expr(users::Column::DeletedAt, Expr::value(now))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id.0))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, ApiError> {
        let page = page.clamped();
        let mut query = users::Entity::find().filter(users::Column::DeletedAt.is_null());
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(users::Column::FullName)))
                            .like(pattern.as_str()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(users::Column::Email)))
                            .like(pattern.as_str()),
                    ),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = query
            .order_by_asc(users::Column::Id)
            .paged(page)
            .all(&self.db)
            .await
            .context("list users")?;
        let items = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            meta: PageMeta::new(page, total),
        })
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse::<Role>()
        .with_context(|| format!("user {} has unreadable role", model.id))?;
    Ok(User {
        id: UserId(model.id),
        full_name: model.full_name,
        email: model.email,
        password_hash: model.password_hash,
        phone: model.phone,
        location: model.location,
        bio: model.bio,
        profile_image: model.profile_image,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Artist repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbArtistRepository {
    pub db: DatabaseConnection,
}

impl DbArtistRepository {
    async fn find_live(&self, id: ArtistId) -> Result<Option<artists::Model>, ApiError> {
        let model = artists::Entity::find_by_id(id.0)
            .filter(artists::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find artist by id")?;
        Ok(model)
    }
}

impl ArtistRepository for DbArtistRepository {
    async fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, ApiError> {
        Ok(self.find_live(id).await?.map(artist_from_model))
    }

    async fn create(&self, artist: &NewArtist) -> Result<Artist, ApiError> {
        let now = Utc::now();
        let result = artists::ActiveModel {
            ref_user_id: Set(artist.ref_user_id.map(|id| id.0)),
            name: Set(artist.name.clone()),
            bio: Set(artist.bio.clone()),
            genre: Set(artist.genre.clone()),
            country: Set(artist.country.clone()),
            debut_year: Set(artist.debut_year.clone()),
            website: Set(artist.website.clone()),
            email: Set(artist.email.clone()),
            phone: Set(artist.phone.clone()),
            profile_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(artist_from_model(model)),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                Err(ApiError::InvalidInput(
                    "ref_user_id does not name an existing user".into(),
                ))
            }
            Err(e) => Err(anyhow::Error::new(e).context("create artist").into()),
        }
    }

    async fn update(
        &self,
        id: ArtistId,
        patch: &ArtistPatch,
    ) -> Result<Option<Artist>, ApiError> {
        let Some(model) = self.find_live(id).await? else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref bio) = patch.bio {
            am.bio = Set(bio.clone());
        }
        if let Some(ref genre) = patch.genre {
            am.genre = Set(Some(genre.clone()));
        }
        if let Some(ref country) = patch.country {
            am.country = Set(Some(country.clone()));
        }
        if let Some(ref debut_year) = patch.debut_year {
            am.debut_year = Set(Some(debut_year.clone()));
        }
        if let Some(ref website) = patch.website {
            am.website = Set(Some(website.clone()));
        }
        if let Some(ref email) = patch.email {
            am.email = Set(email.clone());
        }
        if let Some(ref phone) = patch.phone {
            am.phone = Set(Some(phone.clone()));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update artist")?;
        Ok(Some(artist_from_model(model)))
    }

    async fn soft_delete(&self, id: ArtistId) -> Result<bool, ApiError> {
        let now = Utc::now();
        let result = artists::Entity::update_many()
            .col_expr(artists::Column::DeletedAt, Expr::value(now))
            .col_expr(artists::Column::UpdatedAt, Expr::value(now))
            .filter(artists::Column::Id.eq(id.0))
            .filter(artists::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete artist")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Artist>, ApiError> {
        let page = page.clamped();
        let query = artists::Entity::find().filter(artists::Column::DeletedAt.is_null());
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count artists")?;
        let models = query
            .order_by_asc(artists::Column::Id)
            .paged(page)
            .all(&self.db)
            .await
            .context("list artists")?;
        Ok(Page {
            items: models.into_iter().map(artist_from_model).collect(),
            meta: PageMeta::new(page, total),
        })
    }
}

fn artist_from_model(model: artists::Model) -> Artist {
    Artist {
        id: ArtistId(model.id),
        ref_user_id: model.ref_user_id.map(UserId),
        name: model.name,
        bio: model.bio,
        genre: model.genre,
        country: model.country,
        debut_year: model.debut_year,
        website: model.website,
        email: model.email,
        phone: model.phone,
        profile_image: model.profile_image,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

fn target_filter(kind: &str, id: i64) -> Condition {
    Condition::all()
        .add(follows::Column::TargetKind.eq(kind))
        .add(follows::Column::TargetId.eq(id))
}

/// Re-read the target under a shared row lock so it cannot be deleted or
/// demoted until the edge insert commits.
async fn lock_followable_target(
    txn: &DatabaseTransaction,
    target: FollowTarget,
) -> Result<(), ApiError> {
    match target {
        FollowTarget::User(id) => {
            let model = users::Entity::find_by_id(id.0)
                .filter(users::Column::DeletedAt.is_null())
                .lock_shared()
                .one(txn)
                .await
                .context("lock follow target user")?
                .ok_or(ApiError::UserNotFound)?;
            if !user_from_model(model)?.role.is_followable() {
                return Err(ApiError::NotFollowable);
            }
        }
        FollowTarget::Artist(id) => {
            artists::Entity::find_by_id(id.0)
                .filter(artists::Column::DeletedAt.is_null())
                .lock_shared()
                .one(txn)
                .await
                .context("lock follow target artist")?
                .ok_or(ApiError::ArtistNotFound)?;
        }
    }
    Ok(())
}

impl FollowRepository for DbFollowRepository {
    async fn follow(&self, fan: UserId, target: FollowTarget) -> Result<Option<u64>, ApiError> {
        let kind = target.kind().as_str();
        let target_id = target.raw_id();
        let result = self
            .db
            .transaction::<_, Option<u64>, ApiError>(move |txn| {
                Box::pin(async move {
                    lock_followable_target(txn, target).await?;
                    let edge = follows::ActiveModel {
                        fan_id: Set(fan.0),
                        target_kind: Set(kind.to_owned()),
                        target_id: Set(target_id),
                        created_at: Set(Utc::now()),
                    };
                    let inserted = follows::Entity::insert(edge)
                        .on_conflict(
                            OnConflict::columns([
                                follows::Column::FanId,
                                follows::Column::TargetKind,
                                follows::Column::TargetId,
                            ])
                            .do_nothing()
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await
                        .context("insert follow edge")?;
                    if inserted == 0 {
                        return Ok(None);
                    }
                    let count = follows::Entity::find()
                        .filter(target_filter(kind, target_id))
                        .count(txn)
                        .await
                        .context("count followers")?;
                    Ok(Some(count))
                })
            })
            .await;
        match result {
            Ok(count) => Ok(count),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => {
                Err(anyhow::Error::new(e).context("follow transaction").into())
            }
        }
    }

    async fn unfollow(
        &self,
        fan: UserId,
        target: FollowTarget,
    ) -> Result<Option<u64>, ApiError> {
        let kind = target.kind().as_str();
        let target_id = target.raw_id();
        let count = self
            .db
            .transaction::<_, Option<u64>, DbErr>(move |txn| {
                Box::pin(async move {
                    let deleted = follows::Entity::delete_many()
                        .filter(follows::Column::FanId.eq(fan.0))
                        .filter(target_filter(kind, target_id))
                        .exec(txn)
                        .await?;
                    if deleted.rows_affected == 0 {
                        return Ok(None);
                    }
                    let count = follows::Entity::find()
                        .filter(target_filter(kind, target_id))
                        .count(txn)
                        .await?;
                    Ok(Some(count))
                })
            })
            .await
            .context("delete follow edge")?;
        Ok(count)
    }

    async fn count(&self, target: FollowTarget) -> Result<u64, ApiError> {
        let count = follows::Entity::find()
            .filter(target_filter(target.kind().as_str(), target.raw_id()))
            .count(&self.db)
            .await
            .context("count followers")?;
        Ok(count)
    }

    async fn count_many(
        &self,
        kind: TargetKind,
        ids: &[i64],
    ) -> Result<HashMap<i64, u64>, ApiError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i64, i64)> = follows::Entity::find()
            .select_only()
            .column(follows::Column::TargetId)
            .column_as(Expr::col(follows::Column::FanId).count(), "total")
            .filter(follows::Column::TargetKind.eq(kind.as_str()))
            .filter(follows::Column::TargetId.is_in(ids.iter().copied()))
            .group_by(follows::Column::TargetId)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count followers by target")?;
        Ok(rows
            .into_iter()
            .map(|(id, total)| (id, total.max(0) as u64))
            .collect())
    }

    async fn list_followers(&self, target: FollowTarget) -> Result<Vec<UserId>, ApiError> {
        let edges = follows::Entity::find()
            .filter(target_filter(target.kind().as_str(), target.raw_id()))
            .order_by_asc(follows::Column::CreatedAt)
            .order_by_asc(follows::Column::FanId)
            .all(&self.db)
            .await
            .context("list followers")?;
        Ok(edges.into_iter().map(|edge| UserId(edge.fan_id)).collect())
    }
}
