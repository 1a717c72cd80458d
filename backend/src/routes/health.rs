//! Health check endpoints
//!
//! `/health` and `/health/live` answer as long as the process is serving
//! requests. `/health/ready` also pings PostgreSQL and answers 503 when the
//! database is unreachable.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseCheck>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<db::PoolStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn status(status: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: None,
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    status("healthy")
}

pub async fn liveness_check() -> Json<HealthResponse> {
    status("alive")
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, label, database) = match db::health_check(state.db()).await {
        Ok(pool) => (
            StatusCode::OK,
            "ready",
            DatabaseCheck {
                healthy: true,
                pool: Some(pool),
                error: None,
            },
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "not_ready",
            DatabaseCheck {
                healthy: false,
                pool: None,
                error: Some(e.to_string()),
            },
        ),
    };

    (
        code,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            database: Some(database),
        }),
    )
}
