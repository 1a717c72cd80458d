//! Tag lookups

use crate::error::ApiError;
use crate::repositories::{TagRecord, TagRepository};
use foodgram_shared::types::TagResponse;
use sqlx::PgPool;
use uuid::Uuid;

impl From<TagRecord> for TagResponse {
    fn from(tag: TagRecord) -> Self {
        TagResponse {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

pub struct TagService;

impl TagService {
    pub async fn list(pool: &PgPool) -> Result<Vec<TagResponse>, ApiError> {
        let tags = TagRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;

        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<TagResponse, ApiError> {
        TagRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .map(TagResponse::from)
            .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))
    }
}
