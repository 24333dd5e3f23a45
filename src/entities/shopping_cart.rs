//! Shopping cart entity - A cart entry linking a user to a recipe they plan to cook.
//!
//! At most one entry exists per (user, recipe) pair. Entry ids increase with insertion,
//! which gives the shopping list its stable ordering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_carts")]
pub struct Model {
    /// Unique identifier for the cart entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID owning the cart
    pub user_id: String,
    /// Recipe in the cart
    pub recipe_id: i64,
}

/// Defines relationships between a cart entry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart entry references one recipe
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
