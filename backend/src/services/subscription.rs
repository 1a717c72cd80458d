//! Following authors

use crate::error::ApiError;
use crate::repositories::{
    unique_violation, FollowedAuthorRecord, RecipeRepository, SubscriptionRepository,
};
use foodgram_shared::types::{Page, PageWindow, ShortRecipe, SubscriptionResponse, UserResponse};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub struct SubscriptionService;

impl SubscriptionService {
    /// Follow `author_id`, returning the author with a recipe preview
    pub async fn subscribe(
        pool: &PgPool,
        user_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<i64>,
    ) -> Result<SubscriptionResponse, ApiError> {
        if user_id == author_id {
            return Err(ApiError::field("author", "You cannot subscribe to yourself"));
        }

        let author = SubscriptionRepository::find_author(pool, author_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if SubscriptionRepository::exists(pool, user_id, author_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::field("author", "Already subscribed to this author"));
        }

        SubscriptionRepository::create(pool, user_id, author_id)
            .await
            .map_err(|err| match unique_violation(&err) {
                Some(_) => ApiError::field("author", "Already subscribed to this author"),
                None => ApiError::Internal(err),
            })?;

        info!(user_id = %user_id, author_id = %author_id, "Subscribed");

        let mut responses = Self::with_recipes(pool, vec![author], recipes_limit).await?;
        responses
            .pop()
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn unsubscribe(pool: &PgPool, user_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        SubscriptionRepository::find_author(pool, author_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let removed = SubscriptionRepository::delete(pool, user_id, author_id)
            .await
            .map_err(ApiError::Internal)?;
        if !removed {
            return Err(ApiError::field("author", "You are not subscribed to this author"));
        }

        info!(user_id = %user_id, author_id = %author_id, "Unsubscribed");
        Ok(())
    }

    /// Authors the caller follows, each with a recipe preview
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        window: PageWindow,
        recipes_limit: Option<i64>,
    ) -> Result<Page<SubscriptionResponse>, ApiError> {
        let (authors, count) =
            SubscriptionRepository::list_authors(pool, user_id, window.limit, window.offset())
                .await
                .map_err(ApiError::Internal)?;

        let results = Self::with_recipes(pool, authors, recipes_limit).await?;
        Ok(Page::new(results, count, window))
    }

    /// Attach each author's newest recipes; the caller follows all of them
    async fn with_recipes(
        pool: &PgPool,
        authors: Vec<FollowedAuthorRecord>,
        recipes_limit: Option<i64>,
    ) -> Result<Vec<SubscriptionResponse>, ApiError> {
        let ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();
        let recipes = if ids.is_empty() {
            Vec::new()
        } else {
            RecipeRepository::short_by_authors(pool, &ids, recipes_limit)
                .await
                .map_err(ApiError::Internal)?
        };

        let mut by_author: HashMap<Uuid, Vec<ShortRecipe>> = HashMap::new();
        for recipe in recipes {
            by_author
                .entry(recipe.author_id)
                .or_default()
                .push(ShortRecipe::from(recipe));
        }

        Ok(authors
            .into_iter()
            .map(|author| SubscriptionResponse {
                recipes: by_author.remove(&author.id).unwrap_or_default(),
                recipes_count: author.recipes_count,
                user: UserResponse {
                    email: author.email,
                    id: author.id,
                    username: author.username,
                    first_name: author.first_name,
                    last_name: author.last_name,
                    is_subscribed: true,
                },
            })
            .collect())
    }
}
