//! Recipe business logic - Handles recipe authoring, lookup, and filtering.
//!
//! A recipe is written together with its ingredient lines and tag links inside a single
//! database transaction, so readers never observe a recipe without its lines. Only the
//! author may update or delete a recipe.

use crate::{
    config::settings::AmountLimits,
    entities::{
        Favorite, Ingredient, Recipe, RecipeIngredient, RecipeTag, ShoppingCart, Tag, favorite,
        ingredient, recipe, recipe_ingredient, recipe_tag, shopping_cart, tag,
    },
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseTransaction, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait, prelude::*,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// One requested ingredient quantity, as supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient row id
    pub ingredient_id: i64,
    /// Requested amount; checked against [`AmountLimits`]
    pub amount: i64,
}

/// Input for creating or replacing a recipe.
#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    /// Recipe title
    pub name: String,
    /// Description / instructions
    pub text: String,
    /// Cooking time in minutes; checked against [`AmountLimits`]
    pub cooking_time: i64,
    /// Ingredient quantities, at least one, no ingredient repeated
    pub ingredients: Vec<IngredientAmount>,
    /// Tag slugs, at least one, no slug repeated
    pub tag_slugs: Vec<String>,
}

/// An ingredient line resolved to its ingredient row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLine {
    /// The referenced ingredient
    pub ingredient: ingredient::Model,
    /// Quantity in the ingredient's unit
    pub amount: i32,
}

/// A recipe together with its lines and tags.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    /// The recipe row
    pub recipe: recipe::Model,
    /// Ingredient lines in insertion order
    pub lines: Vec<RecipeLine>,
    /// Tags ordered by name
    pub tags: Vec<tag::Model>,
}

/// Optional filters for [`list_recipes`]. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author_id: Option<String>,
    /// Only recipes carrying at least one of these tag slugs
    pub tag_slugs: Vec<String>,
    /// Only recipes this user has favorited
    pub favorited_by: Option<String>,
    /// Only recipes in this user's shopping cart
    pub in_cart_of: Option<String>,
    /// Maximum number of recipes returned
    pub limit: Option<u64>,
    /// Number of recipes skipped
    pub offset: Option<u64>,
}

/// Validated form of [`NewRecipe`], with amounts narrowed to their stored width.
struct ValidatedRecipe {
    name: String,
    text: String,
    cooking_time: i32,
    lines: Vec<(i64, i32)>,
    tag_slugs: Vec<String>,
}

fn validate_recipe(limits: &AmountLimits, input: &NewRecipe) -> Result<ValidatedRecipe> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Recipe name cannot be empty".to_string(),
        });
    }
    let text = input.text.trim();
    if text.is_empty() {
        return Err(Error::Validation {
            message: "Recipe text cannot be empty".to_string(),
        });
    }
    let cooking_time = limits.check(input.cooking_time)?;

    if input.ingredients.is_empty() {
        return Err(Error::Validation {
            message: "A recipe needs at least one ingredient".to_string(),
        });
    }
    let mut seen_ingredients = HashSet::new();
    let mut lines = Vec::with_capacity(input.ingredients.len());
    for item in &input.ingredients {
        if !seen_ingredients.insert(item.ingredient_id) {
            return Err(Error::Validation {
                message: format!("Ingredient {} is listed more than once", item.ingredient_id),
            });
        }
        lines.push((item.ingredient_id, limits.check(item.amount)?));
    }

    if input.tag_slugs.is_empty() {
        return Err(Error::Validation {
            message: "A recipe needs at least one tag".to_string(),
        });
    }
    let mut seen_tags = HashSet::new();
    let mut tag_slugs = Vec::with_capacity(input.tag_slugs.len());
    for slug in &input.tag_slugs {
        let slug = slug.trim();
        if !seen_tags.insert(slug) {
            return Err(Error::Validation {
                message: format!("Tag '{slug}' is listed more than once"),
            });
        }
        tag_slugs.push(slug.to_string());
    }

    Ok(ValidatedRecipe {
        name: name.to_string(),
        text: text.to_string(),
        cooking_time,
        lines,
        tag_slugs,
    })
}

/// Resolves tag slugs to ids and checks every ingredient exists, then writes the
/// recipe's lines and tag links.
async fn write_lines_and_tags(
    txn: &DatabaseTransaction,
    recipe_id: i64,
    validated: &ValidatedRecipe,
) -> Result<()> {
    let ingredient_ids: Vec<i64> = validated.lines.iter().map(|(id, _)| *id).collect();
    let known: HashSet<i64> = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
        .all(txn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    if let Some(missing) = ingredient_ids.iter().find(|id| !known.contains(*id)) {
        return Err(Error::IngredientNotFound { id: *missing });
    }

    let tags = Tag::find()
        .filter(tag::Column::Slug.is_in(validated.tag_slugs.iter().cloned()))
        .all(txn)
        .await?;
    if let Some(missing) = validated
        .tag_slugs
        .iter()
        .find(|slug| !tags.iter().any(|t| &t.slug == *slug))
    {
        return Err(Error::TagNotFound {
            slug: missing.clone(),
        });
    }

    let lines = validated
        .lines
        .iter()
        .map(|&(ingredient_id, amount)| recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(ingredient_id),
            amount: Set(amount),
            ..Default::default()
        });
    RecipeIngredient::insert_many(lines).exec(txn).await?;

    let links = tags.iter().map(|t| recipe_tag::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(t.id),
        ..Default::default()
    });
    RecipeTag::insert_many(links).exec(txn).await?;

    Ok(())
}

/// Creates a recipe with its ingredient lines and tags.
///
/// # Errors
/// Returns:
/// - [`Error::Validation`] for blank name/text, no ingredients or tags, or repeats
/// - [`Error::InvalidAmount`] if cooking time or an amount is out of bounds
/// - [`Error::IngredientNotFound`] / [`Error::TagNotFound`] for unknown references
pub async fn create_recipe(
    db: &DatabaseConnection,
    limits: &AmountLimits,
    author_id: &str,
    input: &NewRecipe,
) -> Result<recipe::Model> {
    let validated = validate_recipe(limits, input)?;

    let txn = db.begin().await?;
    let recipe = recipe::ActiveModel {
        author_id: Set(author_id.to_string()),
        name: Set(validated.name.clone()),
        text: Set(validated.text.clone()),
        cooking_time: Set(validated.cooking_time),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    write_lines_and_tags(&txn, recipe.id, &validated).await?;
    txn.commit().await?;

    info!("Recipe {} '{}' created by {author_id}", recipe.id, recipe.name);
    Ok(recipe)
}

async fn find_owned_recipe<C: ConnectionTrait>(
    db: &C,
    actor_id: &str,
    recipe_id: i64,
) -> Result<recipe::Model> {
    let recipe = Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or(Error::RecipeNotFound { id: recipe_id })?;
    if recipe.author_id != actor_id {
        return Err(Error::PermissionDenied {
            message: format!("only the author may modify recipe {recipe_id}"),
        });
    }
    Ok(recipe)
}

/// Replaces a recipe's fields, ingredient lines and tags. Author only.
///
/// # Errors
/// Same as [`create_recipe`], plus [`Error::RecipeNotFound`] and [`Error::PermissionDenied`].
pub async fn update_recipe(
    db: &DatabaseConnection,
    limits: &AmountLimits,
    actor_id: &str,
    recipe_id: i64,
    input: &NewRecipe,
) -> Result<recipe::Model> {
    let validated = validate_recipe(limits, input)?;

    let txn = db.begin().await?;
    let mut recipe: recipe::ActiveModel = find_owned_recipe(&txn, actor_id, recipe_id)
        .await?
        .into();
    recipe.name = Set(validated.name.clone());
    recipe.text = Set(validated.text.clone());
    recipe.cooking_time = Set(validated.cooking_time);
    let recipe = recipe.update(&txn).await?;

    RecipeIngredient::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    RecipeTag::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    write_lines_and_tags(&txn, recipe_id, &validated).await?;
    txn.commit().await?;

    debug!("Recipe {recipe_id} updated by {actor_id}");
    Ok(recipe)
}

/// Deletes a recipe along with its lines, tags, favorites and cart entries. Author only.
pub async fn delete_recipe(db: &DatabaseConnection, actor_id: &str, recipe_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    find_owned_recipe(&txn, actor_id, recipe_id).await?;

    RecipeIngredient::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    RecipeTag::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    Favorite::delete_many()
        .filter(favorite::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    ShoppingCart::delete_many()
        .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    Recipe::delete_by_id(recipe_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Recipe {recipe_id} deleted by {actor_id}");
    Ok(())
}

/// Retrieves a recipe row by id.
pub async fn get_recipe_by_id(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Option<recipe::Model>> {
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a recipe with its resolved ingredient lines and tags.
pub async fn get_recipe_detail(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Option<RecipeDetail>> {
    let Some(recipe) = get_recipe_by_id(db, recipe_id).await? else {
        return Ok(None);
    };

    let lines = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_ingredient::Column::Id)
        .find_also_related(Ingredient)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(line, ingredient)| {
            ingredient.map(|ingredient| RecipeLine {
                ingredient,
                amount: line.amount,
            })
        })
        .collect();

    let tags = recipe
        .find_related(Tag)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?;

    Ok(Some(RecipeDetail {
        recipe,
        lines,
        tags,
    }))
}

/// Lists recipes matching `filter`, newest first, then by name.
pub async fn list_recipes(
    db: &DatabaseConnection,
    filter: &RecipeFilter,
) -> Result<Vec<recipe::Model>> {
    let mut query = Recipe::find();

    if let Some(author_id) = &filter.author_id {
        query = query.filter(recipe::Column::AuthorId.eq(author_id.as_str()));
    }
    if !filter.tag_slugs.is_empty() {
        let tagged = RecipeTag::find()
            .select_only()
            .column(recipe_tag::Column::RecipeId)
            .inner_join(Tag)
            .filter(tag::Column::Slug.is_in(filter.tag_slugs.iter().cloned()))
            .into_query();
        query = query.filter(recipe::Column::Id.in_subquery(tagged));
    }
    if let Some(user_id) = &filter.favorited_by {
        let favorites = Favorite::find()
            .select_only()
            .column(favorite::Column::RecipeId)
            .filter(favorite::Column::UserId.eq(user_id.as_str()))
            .into_query();
        query = query.filter(recipe::Column::Id.in_subquery(favorites));
    }
    if let Some(user_id) = &filter.in_cart_of {
        let cart = ShoppingCart::find()
            .select_only()
            .column(shopping_cart::Column::RecipeId)
            .filter(shopping_cart::Column::UserId.eq(user_id.as_str()))
            .into_query();
        query = query.filter(recipe::Column::Id.in_subquery(cart));
    }

    query
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_asc(recipe::Column::Name)
        .order_by_desc(recipe::Column::Id)
        .offset(filter.offset)
        .limit(filter.limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds recipes whose name contains `partial`, for autocomplete.
pub async fn search_recipes(
    db: &DatabaseConnection,
    partial: &str,
    limit: u64,
) -> Result<Vec<recipe::Model>> {
    Recipe::find()
        .filter(recipe::Column::Name.contains(partial.trim()))
        .order_by_asc(recipe::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts recipes written by `author_id`.
pub async fn count_recipes_by_author(db: &DatabaseConnection, author_id: &str) -> Result<u64> {
    Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author_id))
        .count(db)
        .await
        .map_err(Into::into)
}
