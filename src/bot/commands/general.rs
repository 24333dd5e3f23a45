//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**RecipeBuddy Help**\n\
        Here is a summary of all available commands for RecipeBuddy.\n\n\
        **Recipes**\n\
        • `/recipe create <name> <text> <cooking_time> <ingredients> <tags>` - Publishes a recipe. \
        Ingredients are `name (unit)=amount` separated by commas, tags are slugs separated by commas.\n\
        • `/recipe show <recipe>` - Shows a recipe with its ingredients.\n\
        • `/recipe list [author] [tag] [favorited] [in_cart]` - Lists recipes.\n\
        • `/recipe update <recipe> <name> <text> <cooking_time> <ingredients> <tags>` - Replaces one of your recipes.\n\
        • `/recipe delete <recipe>` - Deletes one of your recipes.\n\
        • `/ingredients [name]` - Searches the ingredient catalogue.\n\
        • `/tags` - Lists all tags.\n\n\
        **Shopping**\n\
        • `/cart add <recipe>` / `/cart remove <recipe>` - Manages your shopping cart.\n\
        • `/cart list` - Shows the recipes in your cart.\n\
        • `/cart download` - Sends your aggregated shopping list as `shopping_list.txt`.\n\
        • `/favorite add|remove|list` - Manages your favorite recipes.\n\n\
        **Authors**\n\
        • `/subscribe <user>` / `/unsubscribe <user>` - Follows or unfollows an author.\n\
        • `/subscriptions [recipes_limit]` - Lists the authors you follow.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
