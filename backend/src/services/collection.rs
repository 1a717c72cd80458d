//! Favorites, shopping cart and the downloadable shopping list

use crate::error::ApiError;
use crate::repositories::{
    unique_violation, CollectionRepository, RecipeCollection, RecipeRepository,
    ShoppingListRecord,
};
use foodgram_shared::types::ShortRecipe;
use sqlx::PgPool;
use std::fmt::Write;
use tracing::debug;
use uuid::Uuid;

/// File name offered for the shopping list download
pub const SHOPPING_LIST_FILENAME: &str = "shopping_cart.txt";

/// Render aggregated lines as `{name} - {amount} {unit}` with CRLF endings
pub fn render_shopping_list(lines: &[ShoppingListRecord]) -> String {
    let mut out = String::new();
    for line in lines {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{} - {} {}\r\n",
            line.name, line.total_amount, line.measurement_unit
        );
    }
    out
}

pub struct CollectionService;

impl CollectionService {
    fn already_present(collection: RecipeCollection) -> ApiError {
        ApiError::field(
            "recipe",
            format!("Recipe is already in {}", collection.label()),
        )
    }

    /// Add a recipe to the caller's favorites or cart
    pub async fn add(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<ShortRecipe, ApiError> {
        let recipe = RecipeRepository::find_short(pool, recipe_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        if CollectionRepository::contains(pool, collection, user_id, recipe_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(Self::already_present(collection));
        }

        CollectionRepository::add(pool, collection, user_id, recipe_id)
            .await
            .map_err(|err| match unique_violation(&err) {
                Some(_) => Self::already_present(collection),
                None => ApiError::Internal(err),
            })?;

        debug!(user_id = %user_id, recipe_id = %recipe_id, ?collection, "Recipe added");
        Ok(ShortRecipe::from(recipe))
    }

    /// Remove a recipe from the caller's favorites or cart
    pub async fn remove(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<(), ApiError> {
        RecipeRepository::find_author(pool, recipe_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        let removed = CollectionRepository::remove(pool, collection, user_id, recipe_id)
            .await
            .map_err(ApiError::Internal)?;
        if !removed {
            return Err(ApiError::field(
                "recipe",
                format!("Recipe is not in {}", collection.label()),
            ));
        }

        debug!(user_id = %user_id, recipe_id = %recipe_id, ?collection, "Recipe removed");
        Ok(())
    }

    /// Plain-text shopping list for everything in the caller's cart
    pub async fn shopping_list(pool: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        let lines = CollectionRepository::shopping_list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(render_shopping_list(&lines))
    }
}
