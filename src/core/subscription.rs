//! Subscription business logic - following recipe authors.

use crate::{
    core::recipe::{self as recipes, RecipeFilter},
    entities::{Subscription, recipe, subscription},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct AuthorSummary {
    /// Discord user ID of the author
    pub author_id: String,
    /// Total number of recipes the author has published
    pub recipes_count: u64,
    /// Newest recipes, at most the requested preview size
    pub recipes: Vec<recipe::Model>,
}

/// Subscribes `user_id` to `author_id`.
///
/// # Errors
/// Returns [`Error::Validation`] when subscribing to oneself and
/// [`Error::AlreadyExists`] when already subscribed.
pub async fn subscribe(
    db: &DatabaseConnection,
    user_id: &str,
    author_id: &str,
) -> Result<subscription::Model> {
    if user_id == author_id {
        return Err(Error::Validation {
            message: "You cannot subscribe to yourself".to_string(),
        });
    }

    let existing = Subscription::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .filter(subscription::Column::AuthorId.eq(author_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::AlreadyExists {
            message: format!("already subscribed to {author_id}"),
        });
    }

    let model = subscription::ActiveModel {
        user_id: Set(user_id.to_string()),
        author_id: Set(author_id.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::from_insert(e, || format!("already subscribed to {author_id}")))?;
    debug!("{user_id} subscribed to {author_id}");
    Ok(model)
}

/// Removes a subscription. Returns `false` if there was none.
pub async fn unsubscribe(db: &DatabaseConnection, user_id: &str, author_id: &str) -> Result<bool> {
    let result = Subscription::delete_many()
        .filter(subscription::Column::UserId.eq(user_id))
        .filter(subscription::Column::AuthorId.eq(author_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Lists the authors `user_id` follows, oldest subscription first, each with up to
/// `recipes_limit` of their newest recipes.
pub async fn list_subscriptions(
    db: &DatabaseConnection,
    user_id: &str,
    recipes_limit: Option<u64>,
) -> Result<Vec<AuthorSummary>> {
    let subscriptions = Subscription::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .order_by_asc(subscription::Column::Id)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(subscriptions.len());
    for sub in subscriptions {
        let filter = RecipeFilter {
            author_id: Some(sub.author_id.clone()),
            limit: recipes_limit,
            ..Default::default()
        };
        summaries.push(AuthorSummary {
            recipes_count: recipes::count_recipes_by_author(db, &sub.author_id).await?,
            recipes: recipes::list_recipes(db, &filter).await?,
            author_id: sub.author_id,
        });
    }
    Ok(summaries)
}
