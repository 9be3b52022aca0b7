use bytes::Bytes;
use uuid::Uuid;

use soundcave_domain::id::UserId;

use crate::domain::repository::{ObjectStore, UserRepository};
use crate::domain::types::{User, UserPatch};
use crate::error::ApiError;

/// File extension for an accepted raster image type, or `None` for anything else.
///
/// Scriptable formats such as SVG are refused since stored files are served same-origin.
fn image_extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub struct UpdateProfileImageInput {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Store a new profile image and point the caller's profile at it.
pub struct UpdateProfileImageUseCase<R: UserRepository, S: ObjectStore> {
    pub repo: R,
    pub store: S,
}

impl<R: UserRepository, S: ObjectStore> UpdateProfileImageUseCase<R, S> {
    pub async fn execute(
        &self,
        user_id: UserId,
        input: UpdateProfileImageInput,
    ) -> Result<User, ApiError> {
        let ext = image_extension(&input.content_type).ok_or(ApiError::UnsupportedMediaType)?;
        if input.bytes.is_empty() {
            return Err(ApiError::InvalidInput("image body is empty".into()));
        }
        let current = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let key = format!("profiles/{user_id}/{}.{ext}", Uuid::now_v7());
        let url = self.store.put(&key, input.bytes, &input.content_type).await?;
        let patch = UserPatch {
            profile_image: Some(url),
            ..Default::default()
        };
        let user = self
            .repo
            .update(user_id, &patch)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // The previous image is garbage now; failing to remove it is not fatal.
        if let Some(old_key) = current
            .profile_image
            .as_deref()
            .and_then(|url| self.store.key_for_url(url))
        {
            if let Err(e) = self.store.delete(&old_key).await {
                tracing::warn!(
                    %user_id,
                    key = %old_key,
                    error = %e,
                    "failed to remove old profile image"
                );
            }
        }
        Ok(user)
    }
}
