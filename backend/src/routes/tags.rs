//! Tag routes (read-only)

use crate::error::ApiResult;
use crate::services::TagService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use foodgram_shared::types::TagResponse;
use uuid::Uuid;

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/:id", get(get_tag))
}

async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TagResponse>>> {
    Ok(Json(TagService::list(state.db()).await?))
}

async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TagResponse>> {
    Ok(Json(TagService::get(state.db(), id).await?))
}
