//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod collection;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

pub use collection::{CollectionRepository, RecipeCollection, ShoppingListRecord};
pub use ingredient::{CreateIngredient, IngredientRecord, IngredientRepository};
pub use recipe::{
    RecipeIngredientRecord, RecipeInput, RecipeListFilter, RecipeRecord, RecipeRepository,
    ShortRecipeRecord,
};
pub use subscription::{FollowedAuthorRecord, SubscriptionRepository};
pub use tag::{CreateTag, RecipeTagRecord, TagRecord, TagRepository};
pub use user::{CreateUser, UserProfileRecord, UserRecord, UserRepository};

/// Name of the unique constraint a failed write tripped over, if any
///
/// Lets services turn races on unique links (double favorite, double
/// follow) into the same 400 the pre-check would have produced.
pub fn unique_violation(err: &anyhow::Error) -> Option<String> {
    let db_err = err.downcast_ref::<sqlx::Error>()?.as_database_error()?;
    if db_err.is_unique_violation() {
        Some(db_err.constraint().unwrap_or_default().to_string())
    } else {
        None
    }
}
