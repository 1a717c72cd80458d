//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use foodgram_shared::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub date_joined: DateTime<Utc>,
}

impl UserRecord {
    /// Parsed role; unknown values fall back to a regular user
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// User as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
}

const PROFILE_COLUMNS: &str = r#"
    u.id, u.email, u.username, u.first_name, u.last_name,
    EXISTS(
        SELECT 1 FROM subscriptions s
        WHERE s.user_id = $1::uuid AND s.author_id = u.id
    ) AS is_subscribed
"#;

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, username, first_name, last_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, username, first_name, last_name, password_hash, role, date_joined
            "#,
        )
        .bind(&input.email)
        .bind(&input.username)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash, role, date_joined
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash, role, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find one user as seen by `viewer`
    pub async fn find_profile(
        pool: &PgPool,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<UserProfileRecord>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users u WHERE u.id = $2");
        let profile = sqlx::query_as::<_, UserProfileRecord>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    /// Find several users as seen by `viewer`, in no particular order
    pub async fn find_profiles(
        pool: &PgPool,
        ids: &[Uuid],
        viewer: Option<Uuid>,
    ) -> Result<Vec<UserProfileRecord>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users u WHERE u.id = ANY($2)");
        let profiles = sqlx::query_as::<_, UserProfileRecord>(&sql)
            .bind(viewer)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(profiles)
    }

    /// List users, newest first, with the total count
    pub async fn list_profiles(
        pool: &PgPool,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserProfileRecord>, i64)> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM users u ORDER BY u.date_joined DESC, u.id LIMIT $2 OFFSET $3"
        );
        let profiles = sqlx::query_as::<_, UserProfileRecord>(&sql)
            .bind(viewer)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok((profiles, Self::count(pool).await?))
    }

    /// Total number of users
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Check if email exists (case-insensitive)
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if username exists
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
        let result =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;

        Ok(result)
    }

    /// Replace a user's password hash
    pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
