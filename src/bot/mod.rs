//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the RecipeBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.
//! The Discord user id of the invoking member is the user identity for every command.

/// Discord command implementations (recipes, cart, favorites, subscriptions, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::AmountLimits,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the validation limits
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Bounds for ingredient amounts and cooking times
    pub limits: AmountLimits,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and limits.
    #[must_use]
    pub const fn new(database: DatabaseConnection, limits: AmountLimits) -> Self {
        Self { database, limits }
    }
}

/// Turns a domain error into a reply for the user, or `None` for internal failures
/// that should not be shown verbatim.
#[must_use]
pub fn user_facing_message(error: &Error) -> Option<String> {
    match error {
        Error::Validation { message } => Some(format!("❌ {message}")),
        Error::InvalidAmount { .. }
        | Error::RecipeNotFound { .. }
        | Error::IngredientNotFound { .. }
        | Error::TagNotFound { .. } => Some(format!("❌ {error}")),
        Error::AlreadyExists { message } => Some(format!("⚠️ {message}")),
        Error::PermissionDenied { message } => Some(format!("🚫 {message}")),
        _ => None,
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = user_facing_message(&error).unwrap_or_else(|| {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong. Please try again later.".to_string()
            });
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers all commands and runs the Discord client until it stops.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands globally", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting Discord client...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await.map_err(Into::into)
}
