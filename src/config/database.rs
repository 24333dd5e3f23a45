//! Database configuration module for `RecipeBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Composite uniqueness rules (one cart entry
//! per user and recipe, one line per recipe and ingredient, ...) are added as unique indexes.

use crate::entities::{
    Favorite, FavoriteColumn, Ingredient, Recipe, RecipeIngredient, RecipeIngredientColumn,
    RecipeTag, RecipeTagColumn, ShoppingCart, ShoppingCartColumn, Subscription,
    SubscriptionColumn, Tag,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/recipe_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to
/// a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables and unique indexes if they do not exist yet.
///
/// Safe to call on every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Ingredient),
        schema.create_table_from_entity(Tag),
        schema.create_table_from_entity(Recipe),
        schema.create_table_from_entity(RecipeIngredient),
        schema.create_table_from_entity(RecipeTag),
        schema.create_table_from_entity(Favorite),
        schema.create_table_from_entity(ShoppingCart),
        schema.create_table_from_entity(Subscription),
    ];
    for mut table in tables {
        let statement = table.if_not_exists().to_owned();
        db.execute(builder.build(&statement)).await?;
    }

    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    info!("Database tables ready");
    Ok(())
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_unique_recipe_ingredient")
            .table(RecipeIngredient)
            .col(RecipeIngredientColumn::RecipeId)
            .col(RecipeIngredientColumn::IngredientId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_unique_recipe_tag")
            .table(RecipeTag)
            .col(RecipeTagColumn::RecipeId)
            .col(RecipeTagColumn::TagId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_unique_favorite")
            .table(Favorite)
            .col(FavoriteColumn::UserId)
            .col(FavoriteColumn::RecipeId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_unique_shopping_cart")
            .table(ShoppingCart)
            .col(ShoppingCartColumn::UserId)
            .col(ShoppingCartColumn::RecipeId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_unique_subscription")
            .table(Subscription)
            .col(SubscriptionColumn::UserId)
            .col(SubscriptionColumn::AuthorId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}
