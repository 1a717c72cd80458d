//! Ingredient routes (read-only)

use crate::error::ApiResult;
use crate::services::IngredientService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use foodgram_shared::types::{IngredientResponse, IngredientSearchQuery};
use uuid::Uuid;

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_ingredients))
        .route("/:id", get(get_ingredient))
}

/// GET /api/ingredients?name=
async fn search_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientSearchQuery>,
) -> ApiResult<Json<Vec<IngredientResponse>>> {
    let items = IngredientService::search(state.db(), query.name.as_deref()).await?;
    Ok(Json(items))
}

async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<IngredientResponse>> {
    Ok(Json(IngredientService::get(state.db(), id).await?))
}
