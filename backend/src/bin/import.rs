//! Load CSV fixtures into the Foodgram database
//!
//! ```text
//! foodgram-import ingredients data/ingredients.csv
//! foodgram-import tags data/tags.csv
//! foodgram-import users data/users.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram_backend::fixtures::{self, ImportOutcome};
use foodgram_backend::{config, db, telemetry};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "foodgram-import")]
#[command(about = "Load CSV fixtures into the Foodgram database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingredients: `name,measurement_unit` per line, no header
    Ingredients { file: PathBuf },
    /// Tags: CSV with a `name,color,slug` header
    Tags { file: PathBuf },
    /// Users: CSV with a `username,email,first_name,last_name,password` header
    Users { file: PathBuf },
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Cannot open {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cli = Cli::parse();
    let config = config::AppConfig::load()?;

    let mut database = config.database.clone();
    database.max_connections = 2;
    let pool = db::create_pool(&database).await?;
    if !config::AppConfig::is_production() {
        db::run_migrations(&pool).await?;
    }

    let (what, outcome) = match cli.command {
        Commands::Ingredients { file } => {
            let rows = fixtures::parse_ingredients(open(&file)?)?;
            ("ingredients", fixtures::import_ingredients(&pool, &rows).await?)
        }
        Commands::Tags { file } => {
            let rows = fixtures::parse_tags(open(&file)?)?;
            ("tags", fixtures::import_tags(&pool, &rows).await?)
        }
        Commands::Users { file } => {
            let rows = fixtures::parse_users(open(&file)?)?;
            ("users", fixtures::import_users(&pool, &rows).await?)
        }
    };

    match outcome {
        ImportOutcome::Skipped { existing } => warn!(
            table = what,
            existing,
            "Table already has data, nothing imported; empty it first to reload"
        ),
        ImportOutcome::Loaded {
            inserted,
            duplicates,
        } => info!(table = what, inserted, duplicates, "Import finished"),
    }

    Ok(())
}
