//! Favorites and shopping cart
//!
//! Both are (user, recipe) link tables with identical shape, so one
//! repository serves both, keyed by [`RecipeCollection`].

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// A per-user set of recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    fn table(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable name for error messages
    pub fn label(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "the shopping cart",
        }
    }
}

/// One aggregated shopping list line
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingListRecord {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

pub struct CollectionRepository;

impl CollectionRepository {
    pub async fn contains(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
            collection.table()
        );
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Insert the link; a duplicate surfaces as a unique violation
    pub async fn add(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Remove the link; false if it did not exist
    pub async fn remove(
        pool: &PgPool,
        collection: RecipeCollection,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ingredient totals over every recipe in the user's cart
    pub async fn shopping_list(pool: &PgPool, user_id: Uuid) -> Result<Vec<ShoppingListRecord>> {
        let lines = sqlx::query_as::<_, ShoppingListRecord>(
            r#"
            SELECT i.name, i.measurement_unit, SUM(ri.amount)::bigint AS total_amount
            FROM shopping_cart c
            JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE c.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name ASC, i.measurement_unit ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(lines)
    }
}
