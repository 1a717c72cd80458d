//! Tag repository

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Tag record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Tag attached to a recipe
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeTagRecord {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<RecipeTagRecord> for TagRecord {
    fn from(row: RecipeTagRecord) -> Self {
        TagRecord {
            id: row.id,
            name: row.name,
            color: row.color,
            slug: row.slug,
        }
    }
}

/// Input for creating a tag
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Tag repository
pub struct TagRepository;

impl TagRepository {
    /// All tags ordered by name
    pub async fn list(db: &PgPool) -> Result<Vec<TagRecord>> {
        let tags = sqlx::query_as::<_, TagRecord>(
            "SELECT id, name, color, slug FROM tags ORDER BY name ASC",
        )
        .fetch_all(db)
        .await?;

        Ok(tags)
    }

    /// Find tag by ID
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<TagRecord>> {
        let tag = sqlx::query_as::<_, TagRecord>(
            "SELECT id, name, color, slug FROM tags WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(tag)
    }

    /// IDs from `ids` that exist
    pub async fn existing_ids(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(db)
            .await?;

        Ok(found)
    }

    /// Tags of the given recipes
    pub async fn for_recipes(db: &PgPool, recipe_ids: &[Uuid]) -> Result<Vec<RecipeTagRecord>> {
        let rows = sqlx::query_as::<_, RecipeTagRecord>(
            r#"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Insert a tag; returns None when any unique field already exists
    pub async fn create(db: &PgPool, input: &CreateTag) -> Result<Option<TagRecord>> {
        let tag = sqlx::query_as::<_, TagRecord>(
            r#"
            INSERT INTO tags (name, color, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id, name, color, slug
            "#,
        )
        .bind(&input.name)
        .bind(&input.color)
        .bind(&input.slug)
        .fetch_optional(db)
        .await?;

        Ok(tag)
    }

    pub async fn count(db: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}
