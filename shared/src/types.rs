//! API request and response types

use crate::errors::QueryError;
use crate::validation::{parse_flag, parse_recipes_limit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Pagination
// ============================================================================

/// Default page size for paginated listings
pub const DEFAULT_PAGE_LIMIT: i64 = 6;
/// Upper bound on the page size a client may request
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Page-number pagination parameters (`?page=2&limit=6`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Pagination after defaults and bounds have been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Rows to skip; saturates so an absurd page reads past the end
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl PageQuery {
    /// Clamp page to >= 1 and limit to `1..=max_limit`
    pub fn normalize(&self, default_limit: i64, max_limit: i64) -> PageWindow {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        PageWindow { page, limit }
    }

    /// Read `page` and `limit` from raw query pairs, ignoring other keys
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let mut query = PageQuery::default();
        for (key, value) in pairs {
            query.accept(key, value.trim())?;
        }
        Ok(query)
    }

    fn accept(&mut self, key: &str, value: &str) -> Result<(), QueryError> {
        match key {
            "page" => self.page = Some(parse_number("page", value)?),
            "limit" => self.limit = Some(parse_number("limit", value)?),
            _ => {}
        }
        Ok(())
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, window: PageWindow) -> Self {
        let has_more = window.offset().saturating_add(results.len() as i64) < count;
        Self {
            count,
            page: window.page,
            limit: window.limit,
            has_more,
            results,
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// Users
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address"), length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
}

/// Response body for a freshly registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user (false for anonymous callers)
    pub is_subscribed: bool,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub new_password: String,
    pub current_password: String,
}

/// A followed author together with a preview of their recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipe>,
    pub recipes_count: i64,
}

/// Query for `/users/subscriptions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionsQuery {
    pub page: PageQuery,
    /// Newest recipes to embed per author; `None` embeds all of them
    pub recipes_limit: Option<i64>,
}

impl SubscriptionsQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let raw_limit = pairs
            .iter()
            .rev()
            .find(|(key, _)| key == "recipes_limit")
            .map(|(_, value)| value.as_str());

        Ok(Self {
            page: PageQuery::from_pairs(pairs)?,
            recipes_limit: parse_recipes_limit(raw_limit)?,
        })
    }
}

/// Query for `/users/{id}/subscribe`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipesLimitQuery {
    #[serde(default)]
    pub recipes_limit: Option<String>,
}

// ============================================================================
// Tags and ingredients
// ============================================================================

/// Tag response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Ingredient response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

/// Ingredient search query (`?name=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientSearchQuery {
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Recipes
// ============================================================================

/// Ingredient line inside a recipe response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Compact recipe representation used by favorites, cart and subscriptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortRecipe {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Ingredient reference in a recipe write request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

/// Create / update recipe request
///
/// Updates replace tags and ingredients wholesale, so the same shape is
/// used for both.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeWriteRequest {
    #[validate(length(min = 1, message = "Select at least one ingredient"))]
    pub ingredients: Vec<IngredientAmount>,
    #[validate(length(min = 1, message = "Select at least one tag"))]
    pub tags: Vec<Uuid>,
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub text: String,
    #[validate(range(min = 1, max = 32767, message = "Cooking time must be between 1 and 32767 minutes"))]
    pub cooking_time: i32,
}

/// Filters accepted by the recipe listing
///
/// Built from raw query pairs because `tags` may repeat
/// (`?tags=breakfast&tags=lunch`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub author: Option<Uuid>,
    /// Lower-cased tag slugs; a recipe matches if it carries any of them
    pub tags: Vec<String>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
    pub page: PageQuery,
}

impl RecipeFilter {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let mut filter = RecipeFilter::default();

        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "author" if !value.is_empty() => {
                    let id = Uuid::parse_str(value).map_err(|_| QueryError::InvalidId {
                        field: "author".to_string(),
                    })?;
                    filter.author = Some(id);
                }
                "tags" if !value.is_empty() => {
                    let slug = value.to_lowercase();
                    if !filter.tags.contains(&slug) {
                        filter.tags.push(slug);
                    }
                }
                "is_favorited" if !value.is_empty() => {
                    filter.is_favorited = Some(parse_flag("is_favorited", value)?);
                }
                "is_in_shopping_cart" if !value.is_empty() => {
                    filter.is_in_shopping_cart = Some(parse_flag("is_in_shopping_cart", value)?);
                }
                "page" | "limit" => filter.page.accept(key, value)?,
                _ => {}
            }
        }

        Ok(filter)
    }
}

fn parse_number(field: &str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>().map_err(|_| QueryError::NotAnInteger {
        field: field.to_string(),
    })
}
