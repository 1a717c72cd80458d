//! Ingredient repository

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Ingredient record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

/// Input for creating an ingredient
#[derive(Debug, Clone)]
pub struct CreateIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Escape `LIKE` wildcards so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ingredient repository
pub struct IngredientRepository;

impl IngredientRepository {
    /// Case-insensitive substring search; names starting with the query sort first
    pub async fn search(db: &PgPool, name: Option<&str>) -> Result<Vec<IngredientRecord>> {
        let pattern = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| escape_like(&n.to_lowercase()));

        let items = sqlx::query_as::<_, IngredientRecord>(
            r#"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE $1::text IS NULL OR LOWER(name) LIKE '%' || $1 || '%'
            ORDER BY
                CASE WHEN $1::text IS NOT NULL AND LOWER(name) LIKE $1 || '%' THEN 0 ELSE 1 END,
                name ASC,
                measurement_unit ASC
            "#,
        )
        .bind(pattern)
        .fetch_all(db)
        .await?;

        Ok(items)
    }

    /// Find ingredient by ID
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<IngredientRecord>> {
        let item = sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(item)
    }

    /// IDs from `ids` that exist
    pub async fn existing_ids(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let found =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM ingredients WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(db)
                .await?;

        Ok(found)
    }

    /// Insert an ingredient; returns None when the (name, unit) pair exists
    pub async fn create(db: &PgPool, input: &CreateIngredient) -> Result<Option<IngredientRecord>> {
        let item = sqlx::query_as::<_, IngredientRecord>(
            r#"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            ON CONFLICT (name, measurement_unit) DO NOTHING
            RETURNING id, name, measurement_unit
            "#,
        )
        .bind(&input.name)
        .bind(&input.measurement_unit)
        .fetch_optional(db)
        .await?;

        Ok(item)
    }

    pub async fn count(db: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ingredients")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("salt"), "salt");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
