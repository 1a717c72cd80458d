//! Recipe service
//!
//! Owns recipe write validation, authorship checks and assembly of the
//! nested `RecipeResponse` (tags, author, ingredient lines) from batched
//! queries.

use crate::error::ApiError;
use crate::repositories::{
    unique_violation, IngredientRepository, RecipeIngredientRecord, RecipeInput, RecipeListFilter,
    RecipeRecord, RecipeRepository, ShortRecipeRecord, TagRepository, UserRepository,
};
use foodgram_shared::types::{
    Page, PageWindow, RecipeFilter, RecipeIngredientResponse, RecipeResponse, RecipeWriteRequest,
    ShortRecipe, TagResponse, UserResponse,
};
use foodgram_shared::validation::{find_duplicate, validate_positive_small};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

impl From<ShortRecipeRecord> for ShortRecipe {
    fn from(recipe: ShortRecipeRecord) -> Self {
        ShortRecipe {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: i32::from(recipe.cooking_time),
        }
    }
}

impl From<RecipeIngredientRecord> for RecipeIngredientResponse {
    fn from(line: RecipeIngredientRecord) -> Self {
        RecipeIngredientResponse {
            id: line.ingredient_id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: i32::from(line.amount),
        }
    }
}

/// Checks that need no database access
///
/// Field-level derives first, then duplicates and per-line amounts.
pub fn check_recipe_shape(req: &RecipeWriteRequest) -> Result<RecipeInput, ApiError> {
    req.validate()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::field("name", "Name is required"));
    }
    if req.text.trim().is_empty() {
        return Err(ApiError::field("text", "Description is required"));
    }

    if let Some(id) = find_duplicate(req.tags.iter().copied()) {
        return Err(ApiError::field("tags", format!("Tag {} is listed twice", id)));
    }
    if let Some(id) = find_duplicate(req.ingredients.iter().map(|i| i.id)) {
        return Err(ApiError::field(
            "ingredients",
            format!("Ingredient {} is listed twice", id),
        ));
    }

    let cooking_time = small(req.cooking_time, "cooking_time", "Cooking time")?;
    let ingredients = req
        .ingredients
        .iter()
        .map(|line| Ok((line.id, small(line.amount, "ingredients", "Amount")?)))
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(RecipeInput {
        name: req.name.trim().to_string(),
        text: req.text.clone(),
        image: req.image.clone(),
        cooking_time,
        tag_ids: req.tags.clone(),
        ingredients,
    })
}

fn small(value: i32, field: &str, what: &str) -> Result<i16, ApiError> {
    validate_positive_small(value, what).map_err(|msg| ApiError::field(field, msg))?;
    i16::try_from(value).map_err(|_| ApiError::field(field, format!("{} is out of range", what)))
}

fn missing(wanted: &[Uuid], found: &[Uuid]) -> Option<Uuid> {
    let found: HashSet<&Uuid> = found.iter().collect();
    wanted.iter().find(|id| !found.contains(id)).copied()
}

pub struct RecipeService;

impl RecipeService {
    /// Full validation of a create / update body
    async fn validate_write(
        pool: &PgPool,
        req: &RecipeWriteRequest,
        existing: Option<Uuid>,
    ) -> Result<RecipeInput, ApiError> {
        let input = check_recipe_shape(req)?;

        let tag_ids = TagRepository::existing_ids(pool, &input.tag_ids)
            .await
            .map_err(ApiError::Internal)?;
        if let Some(id) = missing(&input.tag_ids, &tag_ids) {
            return Err(ApiError::field("tags", format!("Tag {} does not exist", id)));
        }

        let wanted: Vec<Uuid> = input.ingredients.iter().map(|(id, _)| *id).collect();
        let ingredient_ids = IngredientRepository::existing_ids(pool, &wanted)
            .await
            .map_err(ApiError::Internal)?;
        if let Some(id) = missing(&wanted, &ingredient_ids) {
            return Err(ApiError::field(
                "ingredients",
                format!("Ingredient {} does not exist", id),
            ));
        }

        if RecipeRepository::name_taken(pool, &input.name, existing)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::field("name", "A recipe with this name already exists"));
        }

        Ok(input)
    }

    fn write_error(err: anyhow::Error) -> ApiError {
        unique_violation(&err)
            .and_then(|constraint| write_conflict(&constraint))
            .unwrap_or(ApiError::Internal(err))
    }

    /// Create a recipe authored by `author_id`
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        req: &RecipeWriteRequest,
    ) -> Result<RecipeResponse, ApiError> {
        let input = Self::validate_write(pool, req, None).await?;

        let id = RecipeRepository::create(pool, author_id, &input)
            .await
            .map_err(Self::write_error)?;

        info!(recipe_id = %id, author_id = %author_id, "Recipe created");
        Self::get(pool, id, Some(author_id)).await
    }

    /// 404 if the recipe is missing, 403 if `user_id` did not write it
    async fn ensure_author(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<(), ApiError> {
        let author = RecipeRepository::find_author(pool, recipe_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        if author != user_id {
            return Err(ApiError::Forbidden(
                "Only the author may change this recipe".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace a recipe's contents
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        recipe_id: Uuid,
        req: &RecipeWriteRequest,
    ) -> Result<RecipeResponse, ApiError> {
        Self::ensure_author(pool, user_id, recipe_id).await?;
        let input = Self::validate_write(pool, req, Some(recipe_id)).await?;

        let updated = RecipeRepository::update(pool, recipe_id, &input)
            .await
            .map_err(Self::write_error)?;
        if !updated {
            return Err(ApiError::NotFound("Recipe not found".to_string()));
        }

        info!(recipe_id = %recipe_id, "Recipe updated");
        Self::get(pool, recipe_id, Some(user_id)).await
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<(), ApiError> {
        Self::ensure_author(pool, user_id, recipe_id).await?;

        RecipeRepository::delete(pool, recipe_id)
            .await
            .map_err(ApiError::Internal)?;

        info!(recipe_id = %recipe_id, "Recipe deleted");
        Ok(())
    }

    pub async fn get(
        pool: &PgPool,
        recipe_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<RecipeResponse, ApiError> {
        let recipe = RecipeRepository::find_by_id(pool, recipe_id, viewer)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        let mut assembled = Self::assemble(pool, vec![recipe], viewer).await?;
        assembled
            .pop()
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
    }

    /// Filtered, paginated listing
    pub async fn list(
        pool: &PgPool,
        viewer: Option<Uuid>,
        filter: &RecipeFilter,
        window: PageWindow,
    ) -> Result<Page<RecipeResponse>, ApiError> {
        let list_filter = RecipeListFilter {
            viewer,
            author: filter.author,
            tags: &filter.tags,
            is_favorited: filter.is_favorited,
            is_in_shopping_cart: filter.is_in_shopping_cart,
        };

        let (recipes, count) =
            RecipeRepository::list(pool, &list_filter, window.limit, window.offset())
                .await
                .map_err(ApiError::Internal)?;

        let results = Self::assemble(pool, recipes, viewer).await?;
        Ok(Page::new(results, count, window))
    }

    /// Compact form, 404 if missing
    pub async fn get_short(pool: &PgPool, recipe_id: Uuid) -> Result<ShortRecipe, ApiError> {
        RecipeRepository::find_short(pool, recipe_id)
            .await
            .map_err(ApiError::Internal)?
            .map(ShortRecipe::from)
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
    }

    /// Attach tags, ingredients and authors with one query each
    async fn assemble(
        pool: &PgPool,
        recipes: Vec<RecipeRecord>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<RecipeResponse>, ApiError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let (tags, ingredients, authors) = tokio::join!(
            TagRepository::for_recipes(pool, &ids),
            RecipeRepository::ingredients_for(pool, &ids),
            UserRepository::find_profiles(pool, &author_ids, viewer),
        );

        let mut tags_by_recipe: HashMap<Uuid, Vec<TagResponse>> = HashMap::new();
        for row in tags.map_err(ApiError::Internal)? {
            let recipe_id = row.recipe_id;
            tags_by_recipe
                .entry(recipe_id)
                .or_default()
                .push(TagResponse::from(crate::repositories::TagRecord::from(row)));
        }

        let mut lines_by_recipe: HashMap<Uuid, Vec<RecipeIngredientResponse>> = HashMap::new();
        for row in ingredients.map_err(ApiError::Internal)? {
            lines_by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(RecipeIngredientResponse::from(row));
        }

        let authors: HashMap<Uuid, UserResponse> = authors
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|profile| (profile.id, UserResponse::from(profile)))
            .collect();

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    ApiError::Internal(anyhow::anyhow!(
                        "author {} of recipe {} not found",
                        recipe.author_id,
                        recipe.id
                    ))
                })?;

                Ok(RecipeResponse {
                    id: recipe.id,
                    tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                    author,
                    ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: recipe.is_favorited,
                    is_in_shopping_cart: recipe.is_in_shopping_cart,
                    name: recipe.name,
                    image: recipe.image,
                    text: recipe.text,
                    cooking_time: i32::from(recipe.cooking_time),
                    pub_date: recipe.pub_date,
                })
            })
            .collect()
    }
}

/// Field error for a unique constraint a recipe write can trip
fn write_conflict(constraint: &str) -> Option<ApiError> {
    match constraint {
        "recipes_name_key" => Some(ApiError::field(
            "name",
            "A recipe with this name already exists",
        )),
        "unique_recipe_ingredient" => {
            Some(ApiError::field("ingredients", "Ingredients must be unique"))
        }
        "recipe_tags_pkey" => Some(ApiError::field("tags", "Tags must be unique")),
        _ => None,
    }
}
