//! Favorite Discord commands - `favorite add`, `favorite remove` and `favorite list`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            favorite,
            recipe::{self as recipes, RecipeFilter},
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for your favorite recipes.
    #[poise::command(
        slash_command,
        subcommands("favorite_add", "favorite_remove", "favorite_list")
    )]
    pub async fn favorite(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use `/favorite add`, `/favorite remove` or `/favorite list`.")
            .await?;
        Ok(())
    }

    /// Adds a recipe to your favorites.
    #[poise::command(slash_command, rename = "add")]
    pub async fn favorite_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to favorite"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        favorite::add_favorite(db, &user_id, recipe_id).await?;
        ctx.say(format!("⭐ Recipe `#{recipe_id}` added to your favorites."))
            .await?;
        Ok(())
    }

    /// Removes a recipe from your favorites.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn favorite_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to unfavorite"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        let message = if favorite::remove_favorite(db, &user_id, recipe_id).await? {
            format!("Recipe `#{recipe_id}` removed from your favorites.")
        } else {
            format!("Recipe `#{recipe_id}` was not in your favorites.")
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Lists your favorite recipes.
    #[poise::command(slash_command, rename = "list")]
    pub async fn favorite_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let filter = RecipeFilter {
            favorited_by: Some(ctx.author().id.to_string()),
            ..Default::default()
        };

        let favorites = recipes::list_recipes(db, &filter).await?;
        if favorites.is_empty() {
            ctx.say("You have no favorites yet.").await?;
            return Ok(());
        }

        let mut response = String::from("**Your favorites**\n");
        for r in &favorites {
            writeln!(&mut response, "• `#{}` {}", r.id, r.name)?;
        }
        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;
