//! Subscription Discord commands - following authors and listing who you follow.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::subscription,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const DEFAULT_RECIPES_LIMIT: u64 = 3;

    /// Follows a recipe author.
    #[poise::command(slash_command)]
    pub async fn subscribe(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Author to follow"] author: serenity::User,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        subscription::subscribe(db, &user_id, &author.id.to_string()).await?;
        ctx.say(format!("🔔 You now follow {}.", author.name)).await?;
        Ok(())
    }

    /// Stops following a recipe author.
    #[poise::command(slash_command)]
    pub async fn unsubscribe(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Author to unfollow"] author: serenity::User,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let message =
            if subscription::unsubscribe(db, &user_id, &author.id.to_string()).await? {
                format!("🔕 You no longer follow {}.", author.name)
            } else {
                format!("You were not following {}.", author.name)
            };
        ctx.say(message).await?;
        Ok(())
    }

    /// Lists the authors you follow with their latest recipes.
    #[poise::command(slash_command)]
    pub async fn subscriptions(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipes to preview per author (default 3)"] recipes_limit: Option<u64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let summaries = subscription::list_subscriptions(
            db,
            &user_id,
            Some(recipes_limit.unwrap_or(DEFAULT_RECIPES_LIMIT)),
        )
        .await?;
        if summaries.is_empty() {
            ctx.say("You are not following anyone yet. Use `/subscribe`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("**Your subscriptions**\n");
        for summary in &summaries {
            writeln!(
                &mut response,
                "\n<@{}> - {} recipes",
                summary.author_id, summary.recipes_count
            )?;
            for r in &summary.recipes {
                writeln!(&mut response, "  • `#{}` {} ({} min)", r.id, r.name, r.cooking_time)?;
            }
        }
        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;
