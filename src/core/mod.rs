//! Core business logic, independent of the Discord layer.

/// Shopping cart membership
pub mod cart;
/// Favorite recipes
pub mod favorite;
/// Ingredient catalogue
pub mod ingredient;
/// Recipe authoring, lookup and filtering
pub mod recipe;
/// Shopping list aggregation and export
pub mod shopping_list;
/// Author subscriptions
pub mod subscription;
/// Recipe tags
pub mod tag;
