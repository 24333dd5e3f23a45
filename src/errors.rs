//! Unified error types for `RecipeBuddy`.
//!
//! Every fallible operation in the core and bot layers returns [`Result`]. Storage
//! failures are flattened into [`Error::Database`] so callers never depend on
//! `SeaORM` error internals.

use thiserror::Error;

/// Application error type shared by the core and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A quantity fell outside the configured bounds
    #[error("Invalid amount {amount}: must be between {min} and {max}")]
    InvalidAmount {
        /// The rejected value
        amount: i64,
        /// Lower bound (inclusive)
        min: i32,
        /// Upper bound (inclusive)
        max: i32,
    },

    /// Input failed a domain validation rule
    #[error("Validation error: {message}")]
    Validation {
        /// Which rule was violated
        message: String,
    },

    /// No recipe with the given id
    #[error("Recipe not found: {id}")]
    RecipeNotFound {
        /// Recipe id that was looked up
        id: i64,
    },

    /// No ingredient with the given id
    #[error("Ingredient not found: {id}")]
    IngredientNotFound {
        /// Ingredient id that was looked up
        id: i64,
    },

    /// No tag with the given slug
    #[error("Tag not found: {slug}")]
    TagNotFound {
        /// Tag slug that was looked up
        slug: String,
    },

    /// A unique association (cart entry, favorite, subscription, tag) already exists
    #[error("Already exists: {message}")]
    AlreadyExists {
        /// What was duplicated
        message: String,
    },

    /// The acting user may not modify the target record
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Why the action was refused
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(String),

    /// Required environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Converts a failed insert into [`Error::AlreadyExists`] when a unique index rejected
    /// it, and into [`Error::Database`] otherwise.
    pub fn from_insert(err: sea_orm::DbErr, message: impl FnOnce() -> String) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Self::AlreadyExists {
                message: message(),
            },
            _ => err.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
