//! Database connection and pool management

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Open a PostgreSQL pool for the configured database
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name("foodgram");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to the database")?;

    info!(max = config.max_connections, "Database pool created");
    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}

/// Snapshot of pool usage for the readiness probe
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: usize,
    /// Round-trip time of `SELECT 1`
    pub latency_ms: u64,
}

/// Ping the database and report pool usage
pub async fn health_check(pool: &PgPool) -> Result<PoolStatus> {
    let started = Instant::now();
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!("Database health check failed: {}", e);
        anyhow::Error::from(e)
    })?;

    Ok(PoolStatus {
        size: pool.size(),
        idle: pool.num_idle(),
        latency_ms: started.elapsed().as_millis() as u64,
    })
}
