//! Subscription (follow) repository

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// An author the user follows, with their recipe count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowedAuthorRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub recipes_count: i64,
}

const AUTHOR_COLUMNS: &str = r#"
    u.id, u.email, u.username, u.first_name, u.last_name,
    (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
"#;

pub struct SubscriptionRepository;

impl SubscriptionRepository {
    pub async fn exists(pool: &PgPool, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Follow `author_id`; duplicates and self-follows fail on constraints
    pub async fn create(pool: &PgPool, user_id: Uuid, author_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Page of followed authors, most recently followed first
    pub async fn list_authors(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FollowedAuthorRecord>, i64)> {
        let sql = format!(
            r#"
            SELECT {AUTHOR_COLUMNS}
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#
        );
        let authors = sqlx::query_as::<_, FollowedAuthorRecord>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok((authors, count))
    }

    /// One user with their recipe count
    pub async fn find_author(pool: &PgPool, author_id: Uuid) -> Result<Option<FollowedAuthorRecord>> {
        let sql = format!("SELECT {AUTHOR_COLUMNS} FROM users u WHERE u.id = $1");
        let author = sqlx::query_as::<_, FollowedAuthorRecord>(&sql)
            .bind(author_id)
            .fetch_optional(pool)
            .await?;

        Ok(author)
    }
}
