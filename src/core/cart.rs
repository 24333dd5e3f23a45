//! Shopping cart business logic - adding and removing recipes from a user's cart.
//!
//! The cart feeds the shopping list export in [`crate::core::shopping_list`]. Adding a
//! recipe twice is an error; removing a recipe that is not in the cart is a silent no-op.

use crate::{
    entities::{Recipe, ShoppingCart, shopping_cart},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Adds a recipe to the user's cart.
///
/// # Errors
/// Returns:
/// - [`Error::RecipeNotFound`] if the recipe does not exist
/// - [`Error::AlreadyExists`] if the recipe is already in the cart
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_id: &str,
    recipe_id: i64,
) -> Result<shopping_cart::Model> {
    if Recipe::find_by_id(recipe_id).one(db).await?.is_none() {
        return Err(Error::RecipeNotFound { id: recipe_id });
    }
    if is_in_cart(db, user_id, recipe_id).await? {
        return Err(Error::AlreadyExists {
            message: format!("recipe {recipe_id} is already in the shopping cart"),
        });
    }

    let entry = shopping_cart::ActiveModel {
        user_id: Set(user_id.to_string()),
        recipe_id: Set(recipe_id),
        ..Default::default()
    };
    let entry = entry.insert(db).await.map_err(|e| {
        Error::from_insert(e, || {
            format!("recipe {recipe_id} is already in the shopping cart")
        })
    })?;
    debug!("Recipe {recipe_id} added to cart of {user_id}");
    Ok(entry)
}

/// Removes a recipe from the user's cart.
///
/// Returns `true` if an entry was removed and `false` if the recipe was not in the cart.
pub async fn remove_from_cart(db: &DatabaseConnection, user_id: &str, recipe_id: i64) -> Result<bool> {
    let result = ShoppingCart::delete_many()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Returns `true` if the recipe is in the user's cart.
pub async fn is_in_cart(db: &DatabaseConnection, user_id: &str, recipe_id: i64) -> Result<bool> {
    let entry = ShoppingCart::find()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
        .one(db)
        .await?;
    Ok(entry.is_some())
}

/// Lists the user's cart entries in the order they were added.
pub async fn list_cart_entries(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<shopping_cart::Model>> {
    ShoppingCart::find()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .order_by_asc(shopping_cart::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_and_remove() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        let entry = add_to_cart(&db, "user1", recipe.id).await?;
        assert_eq!(entry.recipe_id, recipe.id);
        assert!(is_in_cart(&db, "user1", recipe.id).await?);
        assert!(!is_in_cart(&db, "user2", recipe.id).await?);

        assert!(remove_from_cart(&db, "user1", recipe.id).await?);
        assert!(!is_in_cart(&db, "user1", recipe.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_twice_is_rejected() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        add_to_cart(&db, "user1", recipe.id).await?;
        let result = add_to_cart(&db, "user1", recipe.id).await;
        assert!(matches!(result.unwrap_err(), Error::AlreadyExists { .. }));
        assert_eq!(list_cart_entries(&db, "user1").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_adds_report_already_exists() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        let (first, second) = tokio::join!(
            add_to_cart(&db, "user1", recipe.id),
            add_to_cart(&db, "user1", recipe.id)
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(Error::AlreadyExists { .. })))
        );
        assert_eq!(list_cart_entries(&db, "user1").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() -> Result<()> {
        let (db, recipe) = setup_with_recipe().await?;

        assert!(!remove_from_cart(&db, "user1", recipe.id).await?);
        assert!(!remove_from_cart(&db, "user1", 999).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_missing_recipe() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_to_cart(&db, "user1", 999).await;
        assert!(matches!(result.unwrap_err(), Error::RecipeNotFound { id: 999 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_cart_entries_in_insertion_order() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_recipe(&db, "Soup", &[]).await?;
        let second = create_test_recipe(&db, "Bread", &[]).await?;

        add_to_cart(&db, "user1", second.id).await?;
        add_to_cart(&db, "user1", first.id).await?;
        add_to_cart(&db, "user2", first.id).await?;

        let recipes: Vec<_> = list_cart_entries(&db, "user1")
            .await?
            .into_iter()
            .map(|e| e.recipe_id)
            .collect();
        assert_eq!(recipes, vec![second.id, first.id]);

        Ok(())
    }
}
