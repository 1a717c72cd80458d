//! CSV fixture loading
//!
//! Seeds the catalog (ingredients, tags) and demo users from CSV files.
//! Each loader refuses to run against a table that already has rows, so
//! re-running an import is a no-op rather than a pile of duplicates.
//!
//! Formats:
//! - ingredients: no header, `name,measurement_unit`
//! - tags: header `name,color,slug`
//! - users: header `username,email,first_name,last_name,password`

use crate::auth::PasswordService;
use crate::repositories::{
    unique_violation, CreateIngredient, CreateTag, CreateUser, IngredientRepository,
    TagRepository, UserRepository,
};
use anyhow::{bail, Context, Result};
use foodgram_shared::validation::{validate_color, validate_email, validate_slug, validate_username};
use foodgram_shared::Role;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sqlx::PgPool;
use std::io::Read;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRow {
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRow {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Result of one import run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Table already had `existing` rows; nothing was written
    Skipped { existing: i64 },
    Loaded { inserted: usize, duplicates: usize },
}

fn parse<T: DeserializeOwned, R: Read>(reader: R, has_headers: bool) -> Result<Vec<T>> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<T>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Malformed CSV record {}", i + 1)))
        .collect()
}

pub fn parse_ingredients<R: Read>(reader: R) -> Result<Vec<IngredientRow>> {
    let rows: Vec<IngredientRow> = parse(reader, false)?;
    for (i, row) in rows.iter().enumerate() {
        if row.name.is_empty() || row.measurement_unit.is_empty() {
            bail!("Ingredient record {} has an empty field", i + 1);
        }
    }
    Ok(rows)
}

pub fn parse_tags<R: Read>(reader: R) -> Result<Vec<TagRow>> {
    let rows: Vec<TagRow> = parse(reader, true)?;
    for (i, row) in rows.iter().enumerate() {
        if row.name.is_empty() {
            bail!("Tag record {} has an empty name", i + 1);
        }
        validate_color(&row.color).map_err(|e| anyhow::anyhow!("Tag record {}: {}", i + 1, e))?;
        validate_slug(&row.slug).map_err(|e| anyhow::anyhow!("Tag record {}: {}", i + 1, e))?;
    }
    Ok(rows)
}

pub fn parse_users<R: Read>(reader: R) -> Result<Vec<UserRow>> {
    let rows: Vec<UserRow> = parse(reader, true)?;
    for (i, row) in rows.iter().enumerate() {
        validate_email(&row.email).map_err(|e| anyhow::anyhow!("User record {}: {}", i + 1, e))?;
        validate_username(&row.username)
            .map_err(|e| anyhow::anyhow!("User record {}: {}", i + 1, e))?;
        if row.password.is_empty() {
            bail!("User record {} has an empty password", i + 1);
        }
    }
    Ok(rows)
}

pub async fn import_ingredients(pool: &PgPool, rows: &[IngredientRow]) -> Result<ImportOutcome> {
    let existing = IngredientRepository::count(pool).await?;
    if existing > 0 {
        return Ok(ImportOutcome::Skipped { existing });
    }

    let mut inserted = 0;
    for row in rows {
        let input = CreateIngredient {
            name: row.name.clone(),
            measurement_unit: row.measurement_unit.clone(),
        };
        match IngredientRepository::create(pool, &input).await? {
            Some(_) => inserted += 1,
            None => debug!(name = %row.name, unit = %row.measurement_unit, "Duplicate ingredient"),
        }
    }

    info!(inserted, "Ingredients loaded");
    Ok(ImportOutcome::Loaded {
        inserted,
        duplicates: rows.len() - inserted,
    })
}

pub async fn import_tags(pool: &PgPool, rows: &[TagRow]) -> Result<ImportOutcome> {
    let existing = TagRepository::count(pool).await?;
    if existing > 0 {
        return Ok(ImportOutcome::Skipped { existing });
    }

    let mut inserted = 0;
    for row in rows {
        let input = CreateTag {
            name: row.name.clone(),
            color: row.color.clone(),
            slug: row.slug.clone(),
        };
        match TagRepository::create(pool, &input).await? {
            Some(_) => inserted += 1,
            None => debug!(slug = %row.slug, "Duplicate tag"),
        }
    }

    info!(inserted, "Tags loaded");
    Ok(ImportOutcome::Loaded {
        inserted,
        duplicates: rows.len() - inserted,
    })
}

/// Passwords in the file are plain text and get hashed on the way in
pub async fn import_users(pool: &PgPool, rows: &[UserRow]) -> Result<ImportOutcome> {
    let existing = UserRepository::count(pool).await?;
    if existing > 0 {
        return Ok(ImportOutcome::Skipped { existing });
    }

    let mut inserted = 0;
    for row in rows {
        let password_hash = PasswordService::hash_async(row.password.clone()).await?;
        let input = CreateUser {
            email: row.email.clone(),
            username: row.username.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            password_hash,
            role: Role::User,
        };

        match UserRepository::create(pool, &input).await {
            Ok(_) => inserted += 1,
            Err(err) if unique_violation(&err).is_some() => {
                debug!(username = %row.username, "Duplicate user")
            }
            Err(err) => return Err(err),
        }
    }

    info!(inserted, "Users loaded");
    Ok(ImportOutcome::Loaded {
        inserted,
        duplicates: rows.len() - inserted,
    })
}
