//! Favorite entity - A recipe bookmarked by a user.
//!
//! At most one row exists per (user, recipe) pair; a unique index enforces it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Favorite database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorites")]
pub struct Model {
    /// Unique identifier for the favorite
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID who favorited the recipe
    pub user_id: String,
    /// Favorited recipe
    pub recipe_id: i64,
}

/// Defines relationships between Favorite and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each favorite references one recipe
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id",
        on_delete = "Cascade"
    )]
    Recipe,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
