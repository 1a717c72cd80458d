//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories. They return `ApiError` so handlers can `?` straight
//! through.

pub mod collection;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

pub use collection::{render_shopping_list, CollectionService, SHOPPING_LIST_FILENAME};
pub use ingredient::IngredientService;
pub use recipe::RecipeService;
pub use subscription::SubscriptionService;
pub use tag::TagService;
pub use user::UserService;
