//! Recipe entity - A user-authored recipe.
//!
//! Ingredient quantities live in `recipe_ingredients` and tags in `recipe_tags`.
//! `author_id` is the Discord user id of the creator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the author
    pub author_id: String,
    /// Recipe title
    pub name: String,
    /// Free-form description / instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i32,
    /// When the recipe was published
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Recipe and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One recipe has many ingredient lines
    #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
    RecipeIngredients,
    /// One recipe has many tag links
    #[sea_orm(has_many = "super::recipe_tag::Entity")]
    RecipeTags,
    /// One recipe can be favorited by many users
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
    /// One recipe can sit in many shopping carts
    #[sea_orm(has_many = "super::shopping_cart::Entity")]
    ShoppingCarts,
}

impl Related<super::recipe_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::recipe_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeTags.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::shopping_cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoppingCarts.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::recipe_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::recipe_tag::Relation::Recipe.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
