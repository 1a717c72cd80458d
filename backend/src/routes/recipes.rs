//! Recipe routes
//!
//! Listing and detail are public; everything else needs a bearer token.
//! Favorite and shopping-cart toggles share handlers keyed by
//! [`RecipeCollection`].

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiResult;
use crate::repositories::RecipeCollection;
use crate::services::{CollectionService, RecipeService, SHOPPING_LIST_FILENAME};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use foodgram_shared::types::{Page, RecipeFilter, RecipeResponse, RecipeWriteRequest, ShortRecipe};
use uuid::Uuid;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/download_shopping_cart", get(download_shopping_cart))
        .route("/:id", get(get_recipe).patch(update_recipe).delete(delete_recipe))
        .route("/:id/favorite", post(add_favorite).delete(remove_favorite))
        .route("/:id/shopping_cart", post(add_to_cart).delete(remove_from_cart))
}

/// GET /api/recipes
///
/// Raw pairs because `tags` may repeat.
async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Page<RecipeResponse>>> {
    let filter = RecipeFilter::from_pairs(&pairs)?;
    let window = state.page_window(&filter.page);

    let page = RecipeService::list(state.db(), viewer.user_id(), &filter, window).await?;
    Ok(Json(page))
}

/// POST /api/recipes
async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecipeWriteRequest>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let recipe = RecipeService::create(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe = RecipeService::get(state.db(), id, viewer.user_id()).await?;
    Ok(Json(recipe))
}

/// PATCH /api/recipes/:id
async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RecipeWriteRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe = RecipeService::update(state.db(), auth.user_id, id, &req).await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    RecipeService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to(
    state: &AppState,
    collection: RecipeCollection,
    auth: AuthUser,
    recipe_id: Uuid,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    let recipe = CollectionService::add(state.db(), collection, auth.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn remove_from(
    state: &AppState,
    collection: RecipeCollection,
    auth: AuthUser,
    recipe_id: Uuid,
) -> ApiResult<StatusCode> {
    CollectionService::remove(state.db(), collection, auth.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/:id/favorite
async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    add_to(&state, RecipeCollection::Favorites, auth, id).await
}

/// DELETE /api/recipes/:id/favorite
async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    remove_from(&state, RecipeCollection::Favorites, auth, id).await
}

/// POST /api/recipes/:id/shopping_cart
async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    add_to(&state, RecipeCollection::ShoppingCart, auth, id).await
}

/// DELETE /api/recipes/:id/shopping_cart
async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    remove_from(&state, RecipeCollection::ShoppingCart, auth, id).await
}

/// GET /api/recipes/download_shopping_cart
async fn download_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let body = CollectionService::shopping_list(state.db(), auth.user_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
            ),
        ],
        body,
    ))
}
