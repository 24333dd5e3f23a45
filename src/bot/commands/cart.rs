//! Shopping cart Discord commands - `cart add`, `cart remove`, `cart list` and
//! `cart download`.
//!
//! `cart download` delivers the aggregated shopping list as a `shopping_list.txt`
//! attachment.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            cart,
            recipe::{self as recipes, RecipeFilter},
            shopping_list,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Parent command for your shopping cart.
    #[poise::command(
        slash_command,
        subcommands("cart_add", "cart_remove", "cart_list", "cart_download")
    )]
    pub async fn cart(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Shopping cart command. Available subcommands:\n\
            `/cart add` - Add a recipe to your cart\n\
            `/cart remove` - Remove a recipe from your cart\n\
            `/cart list` - Show the recipes in your cart\n\
            `/cart download` - Download your shopping list";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a recipe to your shopping cart.
    #[poise::command(slash_command, rename = "add")]
    pub async fn cart_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to add"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        match cart::add_to_cart(db, &user_id, recipe_id).await {
            Ok(_) => {
                ctx.say(format!("🛒 Recipe `#{recipe_id}` added to your cart."))
                    .await?;
            }
            Err(Error::AlreadyExists { .. }) => {
                ctx.say(format!("⚠️ Recipe `#{recipe_id}` is already in your cart."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Removes a recipe from your shopping cart.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn cart_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to remove"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        let message = if cart::remove_from_cart(db, &user_id, recipe_id).await? {
            format!("🗑️ Recipe `#{recipe_id}` removed from your cart.")
        } else {
            format!("Recipe `#{recipe_id}` was not in your cart.")
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Shows the recipes in your shopping cart.
    #[poise::command(slash_command, rename = "list")]
    pub async fn cart_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let filter = RecipeFilter {
            in_cart_of: Some(user_id),
            ..Default::default()
        };
        let in_cart = recipes::list_recipes(db, &filter).await?;
        if in_cart.is_empty() {
            ctx.say("Your cart is empty. Add recipes with `/cart add`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("**Your cart**\n");
        for r in &in_cart {
            writeln!(&mut response, "• `#{}` {}", r.id, r.name)?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Sends your aggregated shopping list as a text file.
    #[poise::command(slash_command, rename = "download")]
    pub async fn cart_download(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let file = shopping_list::export_shopping_list(db, &user_id).await?;
        info!(
            "Exporting shopping list for {user_id} ({} bytes, {})",
            file.body.len(),
            file.content_type
        );

        let filename = file.filename;
        let attachment = serenity::CreateAttachment::bytes(file.body.into_bytes(), filename);
        ctx.send(
            poise::CreateReply::default()
                .content("📝 Here is your shopping list.")
                .attachment(attachment)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
