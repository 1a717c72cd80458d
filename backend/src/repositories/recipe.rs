//! Recipe repository
//!
//! Recipes are written together with their tag and ingredient links in a
//! single transaction. Read queries take an optional viewer so the
//! `is_favorited` / `is_in_shopping_cart` flags are computed in SQL;
//! anonymous viewers bind NULL and get `false` for both.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Recipe row with viewer-dependent flags
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i16,
    pub pub_date: DateTime<Utc>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Ingredient line of a recipe, joined with the ingredient itself
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeIngredientRecord {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i16,
}

/// Compact recipe row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShortRecipeRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i16,
}

/// Validated recipe contents for insert or full update
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i16,
    pub tag_ids: Vec<Uuid>,
    /// (ingredient id, amount) pairs
    pub ingredients: Vec<(Uuid, i16)>,
}

/// Listing filters, already normalized
#[derive(Debug, Clone, Default)]
pub struct RecipeListFilter<'a> {
    pub viewer: Option<Uuid>,
    pub author: Option<Uuid>,
    pub tags: &'a [String],
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

const RECIPE_COLUMNS: &str = r#"
    r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, r.pub_date,
    EXISTS(
        SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $1::uuid
    ) AS is_favorited,
    EXISTS(
        SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = $1::uuid
    ) AS is_in_shopping_cart
"#;

// $1 viewer, $2 author, $3 tag slugs, $4 favorited, $5 in cart.
// A flag filter with a NULL viewer compares against `false`, so
// `is_favorited=1` yields nothing for anonymous callers.
const LIST_FILTER: &str = r#"
WHERE ($2::uuid IS NULL OR r.author_id = $2)
  AND (cardinality($3::text[]) = 0 OR EXISTS(
        SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = r.id AND LOWER(t.slug) = ANY($3)))
  AND ($4::bool IS NULL OR EXISTS(
        SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = $1::uuid) = $4)
  AND ($5::bool IS NULL OR EXISTS(
        SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = $1::uuid) = $5)
"#;

/// Recipe repository
pub struct RecipeRepository;

impl RecipeRepository {
    /// Insert a recipe with its tags and ingredients
    pub async fn create(pool: &PgPool, author_id: Uuid, input: &RecipeInput) -> Result<Uuid> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipes (author_id, name, text, image, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(author_id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.image)
        .bind(input.cooking_time)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_links(&mut tx, id, input).await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Replace a recipe's fields, tags and ingredients; false if it is gone
    pub async fn update(pool: &PgPool, id: Uuid, input: &RecipeInput) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, text = $3, image = $4, cooking_time = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.text)
        .bind(&input.image)
        .bind(input.cooking_time)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_links(&mut tx, id, input).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn insert_links(conn: &mut PgConnection, id: Uuid, input: &RecipeInput) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recipe_tags (recipe_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS tag_id
            "#,
        )
        .bind(id)
        .bind(input.tag_ids.as_slice())
        .execute(&mut *conn)
        .await?;

        let (ingredient_ids, amounts): (Vec<Uuid>, Vec<i16>) =
            input.ingredients.iter().copied().unzip();

        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount)
            SELECT $1, ingredient_id, amount
            FROM UNNEST($2::uuid[], $3::smallint[]) AS t(ingredient_id, amount)
            "#,
        )
        .bind(id)
        .bind(ingredient_ids.as_slice())
        .bind(amounts.as_slice())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete a recipe; links, favorites and cart entries cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find a recipe as seen by `viewer`
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<RecipeRecord>> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $2");
        let recipe = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(recipe)
    }

    /// Author of a recipe, if it exists
    pub async fn find_author(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>> {
        let author = sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(author)
    }

    /// Compact form of one recipe
    pub async fn find_short(pool: &PgPool, id: Uuid) -> Result<Option<ShortRecipeRecord>> {
        let recipe = sqlx::query_as::<_, ShortRecipeRecord>(
            "SELECT id, author_id, name, image, cooking_time FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Filtered page of recipes, newest first, with the total match count
    pub async fn list(
        pool: &PgPool,
        filter: &RecipeListFilter<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RecipeRecord>, i64)> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r {LIST_FILTER} \
             ORDER BY r.pub_date DESC, r.id LIMIT $6 OFFSET $7"
        );
        let recipes = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(filter.viewer)
            .bind(filter.author)
            .bind(filter.tags)
            .bind(filter.is_favorited)
            .bind(filter.is_in_shopping_cart)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM recipes r {LIST_FILTER}");
        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.viewer)
            .bind(filter.author)
            .bind(filter.tags)
            .bind(filter.is_favorited)
            .bind(filter.is_in_shopping_cart)
            .fetch_one(pool)
            .await?;

        Ok((recipes, count))
    }

    /// Ingredient lines of the given recipes, ordered by ingredient name
    pub async fn ingredients_for(
        pool: &PgPool,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<RecipeIngredientRecord>> {
        let rows = sqlx::query_as::<_, RecipeIngredientRecord>(
            r#"
            SELECT ri.recipe_id, i.id AS ingredient_id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY i.name ASC
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Whether another recipe already uses `name`
    pub async fn name_taken(pool: &PgPool, name: &str, except: Option<Uuid>) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM recipes
                WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(except)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// Newest recipes of each author, at most `per_author` each when given
    pub async fn short_by_authors(
        pool: &PgPool,
        author_ids: &[Uuid],
        per_author: Option<i64>,
    ) -> Result<Vec<ShortRecipeRecord>> {
        let rows = sqlx::query_as::<_, ShortRecipeRecord>(
            r#"
            SELECT id, author_id, name, image, cooking_time
            FROM (
                SELECT r.id, r.author_id, r.name, r.image, r.cooking_time,
                       ROW_NUMBER() OVER (PARTITION BY r.author_id ORDER BY r.pub_date DESC, r.id) AS rn
                FROM recipes r
                WHERE r.author_id = ANY($1)
            ) ranked
            WHERE $2::bigint IS NULL OR rn <= $2
            ORDER BY author_id, rn
            "#,
        )
        .bind(author_ids)
        .bind(per_author)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
