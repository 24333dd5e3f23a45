//! Subscription entity - A user following a recipe author.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    /// Unique identifier for the subscription
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the follower
    pub user_id: String,
    /// Discord user ID of the followed author
    pub author_id: String,
    /// When the subscription was created
    pub created_at: DateTimeUtc,
}

/// `Subscription` references users only, which are not stored locally
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
