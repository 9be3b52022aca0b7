use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use soundcave_auth_types::guard::AdminIdentity;
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::pagination::{PageMeta, PageRequest};

use crate::domain::types::Artist;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::artist::{
    CreateArtistInput, CreateArtistUseCase, DeleteArtistUseCase, GetArtistUseCase,
    ListArtistsUseCase, UpdateArtistInput, UpdateArtistUseCase,
};

#[derive(Serialize)]
pub struct ArtistResponse {
    pub id: ArtistId,
    pub ref_user_id: Option<UserId>,
    pub name: String,
    pub bio: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub total_follower: u64,
    #[serde(serialize_with = "soundcave_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "soundcave_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ArtistResponse {
    fn new(artist: Artist, total_follower: u64) -> Self {
        Self {
            id: artist.id,
            ref_user_id: artist.ref_user_id,
            name: artist.name,
            bio: artist.bio,
            genre: artist.genre,
            country: artist.country,
            debut_year: artist.debut_year,
            website: artist.website,
            email: artist.email,
            phone: artist.phone,
            profile_image: artist.profile_image,
            total_follower,
            created_at: artist.created_at,
            updated_at: artist.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ArtistListResponse {
    pub items: Vec<ArtistResponse>,
    pub meta: PageMeta,
}

// ── POST /api/artists ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateArtistRequest {
    pub ref_user_id: Option<i64>,
    pub name: String,
    pub bio: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn create_artist(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), ApiError> {
    let usecase = CreateArtistUseCase {
        repo: state.artist_repo(),
    };
    let artist = usecase
        .execute(CreateArtistInput {
            ref_user_id: body.ref_user_id,
            name: body.name,
            bio: body.bio,
            genre: body.genre,
            country: body.country,
            debut_year: body.debut_year,
            website: body.website,
            email: body.email,
            phone: body.phone,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ArtistResponse::new(artist, 0))))
}

// ── GET /api/artists ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ArtistListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_artists(
    State(state): State<AppState>,
    Query(query): Query<ArtistListQuery>,
) -> Result<Json<ArtistListResponse>, ApiError> {
    let defaults = PageRequest::default();
    let usecase = ListArtistsUseCase {
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let page = usecase
        .execute(PageRequest {
            page: query.page.unwrap_or(defaults.page),
            limit: query.limit.unwrap_or(defaults.limit),
        })
        .await?;
    let page = page.map(|(artist, total)| ArtistResponse::new(artist, total));
    Ok(Json(ArtistListResponse {
        items: page.items,
        meta: page.meta,
    }))
}

// ── GET /api/artists/{id} ────────────────────────────────────────────────────

pub async fn get_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let usecase = GetArtistUseCase {
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let (artist, total) = usecase.execute(artist_id).await?;
    Ok(Json(ArtistResponse::new(artist, total)))
}

// ── PUT /api/artists/{id} ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateArtistRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_artist(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
    Json(body): Json<UpdateArtistRequest>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let usecase = UpdateArtistUseCase {
        artists: state.artist_repo(),
        follows: state.follow_repo(),
    };
    let (artist, total) = usecase
        .execute(
            artist_id,
            UpdateArtistInput {
                name: body.name,
                bio: body.bio,
                genre: body.genre,
                country: body.country,
                debut_year: body.debut_year,
                website: body.website,
                email: body.email,
                phone: body.phone,
            },
        )
        .await?;
    Ok(Json(ArtistResponse::new(artist, total)))
}

// ── DELETE /api/artists/{id} ─────────────────────────────────────────────────

pub async fn delete_artist(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(artist_id): Path<ArtistId>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteArtistUseCase {
        repo: state.artist_repo(),
    };
    usecase.execute(artist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
