use soundcave_domain::follow::{FollowTarget, TargetKind};
use soundcave_domain::id::{ArtistId, UserId};
use soundcave_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{ArtistRepository, FollowRepository};
use crate::domain::types::{Artist, ArtistPatch, NewArtist};
use crate::error::ApiError;

fn check_debut_year(year: Option<&str>) -> Result<(), ApiError> {
    match year {
        Some(year) if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) => Err(
            ApiError::InvalidInput("debut_year must be a four-digit year".into()),
        ),
        _ => Ok(()),
    }
}

/// Trim a required text field; blank values are rejected.
fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

// ── CreateArtist ─────────────────────────────────────────────────────────────

pub struct CreateArtistInput {
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

pub struct CreateArtistUseCase<R: ArtistRepository> {
    pub repo: R,
}

impl<R: ArtistRepository> CreateArtistUseCase<R> {
    pub async fn execute(&self, input: CreateArtistInput) -> Result<Artist, ApiError> {
        let name = required("name", &input.name)?;
        let bio = required("bio", &input.bio)?;
        let email = required("email", &input.email)?;
        check_debut_year(input.debut_year.as_deref())?;
        let ref_user_id = match input.ref_user_id {
            Some(id) if id <= 0 => {
                return Err(ApiError::InvalidInput("ref_user_id must be positive".into()));
            }
            other => other.map(UserId),
        };
        let artist = self
            .repo
            .create(&NewArtist {
                ref_user_id,
                name,
                bio,
                genre: input.genre,
                country: input.country,
                debut_year: input.debut_year,
                website: input.website,
                email,
                phone: input.phone,
            })
            .await?;
        tracing::info!(artist_id = %artist.id, "artist created");
        Ok(artist)
    }
}

// ── GetArtist ────────────────────────────────────────────────────────────────

pub struct GetArtistUseCase<A: ArtistRepository, F: FollowRepository> {
    pub artists: A,
    pub follows: F,
}

impl<A: ArtistRepository, F: FollowRepository> GetArtistUseCase<A, F> {
    /// The artist and its follower count.
    pub async fn execute(&self, id: ArtistId) -> Result<(Artist, u64), ApiError> {
        let artist = self
            .artists
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ArtistNotFound)?;
        let total = self.follows.count(FollowTarget::Artist(id)).await?;
        Ok((artist, total))
    }
}

// ── UpdateArtist ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateArtistInput {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateArtistUseCase<A: ArtistRepository, F: FollowRepository> {
    pub artists: A,
    pub follows: F,
}

impl<A: ArtistRepository, F: FollowRepository> UpdateArtistUseCase<A, F> {
    /// The updated artist and its follower count. Follow edges are untouched.
    pub async fn execute(
        &self,
        id: ArtistId,
        input: UpdateArtistInput,
    ) -> Result<(Artist, u64), ApiError> {
        check_debut_year(input.debut_year.as_deref())?;
        let patch = ArtistPatch {
            name: input.name.map(|v| required("name", &v)).transpose()?,
            bio: input.bio.map(|v| required("bio", &v)).transpose()?,
            genre: input.genre,
            country: input.country,
            debut_year: input.debut_year,
            website: input.website,
            email: input.email.map(|v| required("email", &v)).transpose()?,
            phone: input.phone,
        };
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("no fields to update".into()));
        }
        let artist = self
            .artists
            .update(id, &patch)
            .await?
            .ok_or(ApiError::ArtistNotFound)?;
        let total = self.follows.count(FollowTarget::Artist(id)).await?;
        Ok((artist, total))
    }
}

// ── DeleteArtist ─────────────────────────────────────────────────────────────

pub struct DeleteArtistUseCase<A: ArtistRepository> {
    pub repo: A,
}

impl<A: ArtistRepository> DeleteArtistUseCase<A> {
    /// Soft delete; the artist stops resolving as a follow target.
    pub async fn execute(&self, id: ArtistId) -> Result<(), ApiError> {
        if !self.repo.soft_delete(id).await? {
            return Err(ApiError::ArtistNotFound);
        }
        tracing::info!(artist_id = %id, "artist soft-deleted");
        Ok(())
    }
}

// ── ListArtists ──────────────────────────────────────────────────────────────

pub struct ListArtistsUseCase<A: ArtistRepository, F: FollowRepository> {
    pub artists: A,
    pub follows: F,
}

impl<A: ArtistRepository, F: FollowRepository> ListArtistsUseCase<A, F> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<(Artist, u64)>, ApiError> {
        let page = self.artists.list(page.clamped()).await?;
        let ids: Vec<i64> = page.items.iter().map(|artist| artist.id.0).collect();
        let counts = self.follows.count_many(TargetKind::Artist, &ids).await?;
        Ok(page.map(|artist| {
            let total = counts.get(&artist.id.0).copied().unwrap_or(0);
            (artist, total)
        }))
    }
}
