//! Token authentication routes
//!
//! Login exchanges email and password for a bearer token pair; refresh
//! exchanges a refresh token for a new pair. Tokens are stateless, so there
//! is no logout endpoint.

use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use foodgram_shared::types::{AuthTokens, LoginRequest, RefreshTokenRequest};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token/login", post(login))
        .route("/token/refresh", post(refresh_token))
}

/// POST /api/auth/token/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/token/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh_token(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(tokens))
}
