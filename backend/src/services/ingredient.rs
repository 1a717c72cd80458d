//! Ingredient lookups and search

use crate::error::ApiError;
use crate::repositories::{IngredientRecord, IngredientRepository};
use foodgram_shared::types::IngredientResponse;
use sqlx::PgPool;
use uuid::Uuid;

impl From<IngredientRecord> for IngredientResponse {
    fn from(item: IngredientRecord) -> Self {
        IngredientResponse {
            id: item.id,
            name: item.name,
            measurement_unit: item.measurement_unit,
        }
    }
}

pub struct IngredientService;

impl IngredientService {
    /// All ingredients, or those whose name contains `name`
    pub async fn search(
        pool: &PgPool,
        name: Option<&str>,
    ) -> Result<Vec<IngredientResponse>, ApiError> {
        let items = IngredientRepository::search(pool, name)
            .await
            .map_err(ApiError::Internal)?;

        Ok(items.into_iter().map(IngredientResponse::from).collect())
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<IngredientResponse, ApiError> {
        IngredientRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .map(IngredientResponse::from)
            .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))
    }
}
