//! User, profile and subscription routes

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiResult;
use crate::services::{SubscriptionService, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use foodgram_shared::types::{
    Page, PageQuery, RecipesLimitQuery, RegisterRequest, RegisteredUser, SetPasswordRequest,
    SubscriptionResponse, SubscriptionsQuery, UserResponse,
};
use foodgram_shared::validation::parse_recipes_limit;
use uuid::Uuid;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/me", get(me))
        .route("/set_password", post(set_password))
        .route("/subscriptions", get(subscriptions))
        .route("/:id", get(get_user))
        .route("/:id/subscribe", post(subscribe).delete(unsubscribe))
}

/// GET /api/users
async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Page<UserResponse>>> {
    let window = state.page_window(&PageQuery::from_pairs(&pairs)?);
    let page = UserService::list(state.db(), viewer.user_id(), window).await?;
    Ok(Json(page))
}

/// POST /api/users
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisteredUser>)> {
    let user = UserService::register(state.db(), &req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.db(), id, viewer.user_id()).await?;
    Ok(Json(user))
}

/// GET /api/users/me
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.db(), auth.user_id, Some(auth.user_id)).await?;
    Ok(Json(user))
}

/// POST /api/users/set_password
async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    UserService::set_password(state.db(), auth.user_id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/subscriptions
async fn subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Page<SubscriptionResponse>>> {
    let query = SubscriptionsQuery::from_pairs(&pairs)?;
    let window = state.page_window(&query.page);

    let page =
        SubscriptionService::list(state.db(), auth.user_id, window, query.recipes_limit).await?;
    Ok(Json(page))
}

/// POST /api/users/:id/subscribe
async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(author_id): Path<Uuid>,
    Query(query): Query<RecipesLimitQuery>,
) -> ApiResult<(StatusCode, Json<SubscriptionResponse>)> {
    let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref())?;

    let subscription =
        SubscriptionService::subscribe(state.db(), auth.user_id, author_id, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// DELETE /api/users/:id/subscribe
async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(author_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    SubscriptionService::unsubscribe(state.db(), auth.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
