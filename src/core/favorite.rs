//! Favorite business logic - bookmarking recipes.
//!
//! Favoriting the same recipe twice is an error; unfavoriting a recipe that was never
//! favorited is a silent no-op.

use crate::{
    entities::{Favorite, Recipe, favorite},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Marks a recipe as a favorite of the user.
///
/// # Errors
/// Returns [`Error::RecipeNotFound`] for an unknown recipe and [`Error::AlreadyExists`]
/// if it is already a favorite.
pub async fn add_favorite(
    db: &DatabaseConnection,
    user_id: &str,
    recipe_id: i64,
) -> Result<favorite::Model> {
    if Recipe::find_by_id(recipe_id).one(db).await?.is_none() {
        return Err(Error::RecipeNotFound { id: recipe_id });
    }
    if is_favorited(db, user_id, recipe_id).await? {
        return Err(Error::AlreadyExists {
            message: format!("recipe {recipe_id} is already a favorite"),
        });
    }

    let model = favorite::ActiveModel {
        user_id: Set(user_id.to_string()),
        recipe_id: Set(recipe_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::from_insert(e, || format!("recipe {recipe_id} is already a favorite")))?;
    debug!("Recipe {recipe_id} favorited by {user_id}");
    Ok(model)
}

/// Removes a favorite. Returns `false` if there was nothing to remove.
pub async fn remove_favorite(db: &DatabaseConnection, user_id: &str, recipe_id: i64) -> Result<bool> {
    let result = Favorite::delete_many()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Returns `true` if the user has favorited the recipe.
pub async fn is_favorited(db: &DatabaseConnection, user_id: &str, recipe_id: i64) -> Result<bool> {
    Ok(Favorite::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::RecipeId.eq(recipe_id))
        .one(db)
        .await?
        .is_some())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_favorite_lifecycle() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        add_favorite(&db, "user1", recipe.id).await?;
        assert!(is_favorited(&db, "user1", recipe.id).await?);

        let duplicate = add_favorite(&db, "user1", recipe.id).await;
        assert!(matches!(duplicate.unwrap_err(), Error::AlreadyExists { .. }));

        assert!(remove_favorite(&db, "user1", recipe.id).await?);
        assert!(!remove_favorite(&db, "user1", recipe.id).await?);
        assert!(!is_favorited(&db, "user1", recipe.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_favorites_report_already_exists() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        let (first, second) = tokio::join!(
            add_favorite(&db, "user1", recipe.id),
            add_favorite(&db, "user1", recipe.id)
        );
        assert!(first.is_ok() != second.is_ok());
        let failed = first.err().or(second.err());
        assert!(matches!(failed, Some(Error::AlreadyExists { .. })));
        assert!(is_favorited(&db, "user1", recipe.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_favorite_missing_recipe() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_favorite(&db, "user1", 7).await;
        assert!(matches!(result.unwrap_err(), Error::RecipeNotFound { id: 7 }));
        Ok(())
    }
}
