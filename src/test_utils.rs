//! Shared test utilities for `RecipeBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{ingredient, tag},
    entities,
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates (or fetches) a catalogue ingredient through the core API.
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    measurement_unit: &str,
) -> Result<entities::ingredient::Model> {
    ingredient::create_ingredient(db, name, measurement_unit).await
}

/// Inserts an ingredient row directly, bypassing the get-or-create check.
/// Used to reproduce duplicate catalogue rows sharing a name and unit.
pub async fn insert_raw_ingredient(
    db: &DatabaseConnection,
    name: &str,
    measurement_unit: &str,
) -> Result<entities::ingredient::Model> {
    entities::ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(measurement_unit.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a recipe with the given `(ingredient_id, amount)` lines.
///
/// Writes rows directly so tests can build recipes the validated API would refuse
/// (no lines, no tags).
///
/// # Defaults
/// * `author_id`: `"test_author"`
/// * `cooking_time`: 30
pub async fn create_test_recipe(
    db: &DatabaseConnection,
    name: &str,
    lines: &[(i64, i32)],
) -> Result<entities::recipe::Model> {
    let recipe = insert_recipe(db, "test_author", name).await?;
    if !lines.is_empty() {
        let models = lines.iter().map(|&(ingredient_id, amount)| {
            entities::recipe_ingredient::ActiveModel {
                recipe_id: Set(recipe.id),
                ingredient_id: Set(ingredient_id),
                amount: Set(amount),
                ..Default::default()
            }
        });
        entities::RecipeIngredient::insert_many(models).exec(db).await?;
    }
    Ok(recipe)
}

/// Creates a recipe without lines for a specific author.
pub async fn create_authored_recipe(
    db: &DatabaseConnection,
    author_id: &str,
    name: &str,
) -> Result<entities::recipe::Model> {
    insert_recipe(db, author_id, name).await
}

async fn insert_recipe(
    db: &DatabaseConnection,
    author_id: &str,
    name: &str,
) -> Result<entities::recipe::Model> {
    entities::recipe::ActiveModel {
        author_id: Set(author_id.to_string()),
        name: Set(name.to_string()),
        text: Set("Test recipe".to_string()),
        cooking_time: Set(30),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up a database containing a single `breakfast` tag.
pub async fn setup_with_tag() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    tag::create_tag(&db, "Breakfast", "breakfast").await?;
    Ok(db)
}

/// Sets up a complete test environment with one recipe.
/// Returns (db, recipe) for cart and favorite tests.
pub async fn setup_with_recipe() -> Result<(DatabaseConnection, entities::recipe::Model)> {
    let db = setup_test_db().await?;
    let recipe = create_test_recipe(&db, "Test Recipe", &[]).await?;
    Ok((db, recipe))
}
