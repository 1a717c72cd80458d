//! Tracing subscriber setup shared by the server and the import tool

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins when set. Production logs are JSON for aggregation;
/// development logs are pretty-printed.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "foodgram_backend=info,tower_http=info".into()
        } else {
            "foodgram_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
