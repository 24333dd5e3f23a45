//! Recipe Discord commands - publishing, browsing, and deleting recipes, plus the
//! ingredient catalogue and tag listings.
//!
//! Ingredients are entered as a comma-separated list of `name (unit)=amount` items, for
//! example `Flour (g)=200, Egg=2`. The unit may be omitted when the catalogue has only one
//! unit for that name.

use crate::errors::{Error, Result};

/// One ingredient item parsed from command input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientInput {
    /// Ingredient name as typed
    pub name: String,
    /// Measurement unit, if given in parentheses
    pub unit: Option<String>,
    /// Requested amount
    pub amount: i64,
}

/// Parses `name (unit)=amount, name=amount, ...`.
///
/// # Errors
/// Returns [`Error::Validation`] when an item has no `=`, a blank name, or a non-integer amount.
pub fn parse_ingredient_list(input: &str) -> Result<Vec<IngredientInput>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_ingredient_item)
        .collect()
}

fn parse_ingredient_item(item: &str) -> Result<IngredientInput> {
    let Some((lhs, rhs)) = item.rsplit_once('=') else {
        return Err(Error::Validation {
            message: format!("Expected `name (unit)=amount`, got `{item}`"),
        });
    };
    let amount = rhs.trim().parse::<i64>().map_err(|_| Error::Validation {
        message: format!("`{}` is not a whole number", rhs.trim()),
    })?;

    let lhs = lhs.trim();
    let (name, unit) = match (lhs.rfind('('), lhs.strip_suffix(')')) {
        (Some(open), Some(without_close)) => {
            let unit = without_close[open + 1..].trim();
            (lhs[..open].trim(), (!unit.is_empty()).then(|| unit.to_string()))
        }
        _ => (lhs, None),
    };
    if name.is_empty() {
        return Err(Error::Validation {
            message: format!("Missing ingredient name in `{item}`"),
        });
    }

    Ok(IngredientInput {
        name: name.to_string(),
        unit,
        amount,
    })
}

/// Splits a comma-separated tag list into trimmed, non-empty slugs.
#[must_use]
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect()
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{IngredientInput, parse_ingredient_list, parse_tag_list};
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            cart, favorite, ingredient,
            recipe::{self as recipes, IngredientAmount, NewRecipe, RecipeFilter},
            tag,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use sea_orm::DatabaseConnection;
    use std::fmt::Write;

    const DEFAULT_LIST_LIMIT: u64 = 10;
    const MAX_LIST_LIMIT: u64 = 25;

    async fn resolve_ingredients(
        db: &DatabaseConnection,
        inputs: Vec<IngredientInput>,
    ) -> Result<Vec<IngredientAmount>> {
        let mut resolved = Vec::with_capacity(inputs.len());
        for input in inputs {
            let candidates = ingredient::find_ingredients_by_name(db, &input.name).await?;
            let chosen = match &input.unit {
                Some(unit) => candidates.iter().find(|c| &c.measurement_unit == unit),
                None if candidates.len() == 1 => candidates.first(),
                None if candidates.is_empty() => None,
                None => {
                    let units: Vec<_> = candidates
                        .iter()
                        .map(|c| c.measurement_unit.as_str())
                        .collect();
                    return Err(Error::Validation {
                        message: format!(
                            "'{}' exists in several units ({}); write it as `{} (unit)=amount`",
                            input.name,
                            units.join(", "),
                            input.name
                        ),
                    });
                }
            };
            let Some(chosen) = chosen else {
                return Err(Error::Validation {
                    message: format!("Unknown ingredient '{}'. Try `/ingredients`.", input.name),
                });
            };
            resolved.push(IngredientAmount {
                ingredient_id: chosen.id,
                amount: input.amount,
            });
        }
        Ok(resolved)
    }

    /// Parent command for publishing and browsing recipes.
    #[poise::command(
        slash_command,
        subcommands(
            "recipe_create",
            "recipe_show",
            "recipe_list",
            "recipe_update",
            "recipe_delete"
        )
    )]
    pub async fn recipe(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Recipe command. Available subcommands:\n\
            `/recipe create` - Publish a new recipe\n\
            `/recipe show` - Show a recipe\n\
            `/recipe list` - List recipes\n\
            `/recipe update` - Replace one of your recipes\n\
            `/recipe delete` - Delete one of your recipes";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Publishes a new recipe.
    #[poise::command(slash_command, rename = "create")]
    pub async fn recipe_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe name"] name: String,
        #[description = "Description and instructions"] text: String,
        #[description = "Cooking time in minutes"] cooking_time: i64,
        #[description = "Ingredients, e.g. `Flour (g)=200, Egg=2`"] ingredients: String,
        #[description = "Tag slugs, e.g. `breakfast, quick`"] tags: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let author_id = ctx.author().id.to_string();

        let inputs = parse_ingredient_list(&ingredients)?;
        let new_recipe = NewRecipe {
            name,
            text,
            cooking_time,
            ingredients: resolve_ingredients(db, inputs).await?,
            tag_slugs: parse_tag_list(&tags),
        };

        let created = recipes::create_recipe(db, &data.limits, &author_id, &new_recipe).await?;
        ctx.say(format!(
            "✅ Recipe **{}** published as `#{}`.",
            created.name, created.id
        ))
        .await?;
        Ok(())
    }

    /// Shows a recipe with its ingredients and tags.
    #[poise::command(slash_command, rename = "show")]
    pub async fn recipe_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to show"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        let Some(detail) = recipes::get_recipe_detail(db, recipe_id).await? else {
            return Err(Error::RecipeNotFound { id: recipe_id });
        };

        let mut ingredient_lines = String::new();
        for line in &detail.lines {
            writeln!(
                &mut ingredient_lines,
                "• {} - {} {}",
                line.ingredient.name, line.amount, line.ingredient.measurement_unit
            )?;
        }
        if ingredient_lines.is_empty() {
            ingredient_lines.push_str("(none)");
        }
        let tag_names = detail
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut status = Vec::new();
        if favorite::is_favorited(db, &user_id, recipe_id).await? {
            status.push("⭐ In your favorites");
        }
        if cart::is_in_cart(db, &user_id, recipe_id).await? {
            status.push("🛒 In your cart");
        }

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("#{} {}", detail.recipe.id, detail.recipe.name))
            .description(&detail.recipe.text)
            .color(0xE67E22)
            .field("Author", format!("<@{}>", detail.recipe.author_id), true)
            .field(
                "Cooking time",
                format!("{} min", detail.recipe.cooking_time),
                true,
            )
            .field("Ingredients", ingredient_lines, false)
            .field("Tags", tag_names, false);
        if !status.is_empty() {
            embed = embed.footer(serenity::CreateEmbedFooter::new(status.join(" · ")));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists recipes, newest first, with optional filters.
    #[poise::command(slash_command, rename = "list")]
    pub async fn recipe_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only recipes by this author"] author: Option<serenity::User>,
        #[description = "Only recipes with this tag"]
        #[autocomplete = "autocomplete::autocomplete_tag"]
        tag: Option<String>,
        #[description = "Only your favorites"] favorited: Option<bool>,
        #[description = "Only recipes in your cart"] in_cart: Option<bool>,
        #[description = "How many recipes to show (max 25)"] limit: Option<u64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let filter = RecipeFilter {
            author_id: author.map(|u| u.id.to_string()),
            tag_slugs: tag.into_iter().collect(),
            favorited_by: favorited.unwrap_or(false).then(|| user_id.clone()),
            in_cart_of: in_cart.unwrap_or(false).then(|| user_id.clone()),
            limit: Some(limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)),
            offset: None,
        };
        let found = recipes::list_recipes(db, &filter).await?;

        if found.is_empty() {
            ctx.say("No recipes match. Publish one with `/recipe create`!")
                .await?;
            return Ok(());
        }

        let mut response = String::from("**Recipes**\n");
        for r in &found {
            writeln!(
                &mut response,
                "`#{}` **{}** - {} min, by <@{}>",
                r.id, r.name, r.cooking_time, r.author_id
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Replaces one of your recipes, including all of its ingredients and tags.
    #[poise::command(slash_command, rename = "update")]
    pub async fn recipe_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to update"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
        #[description = "New recipe name"] name: String,
        #[description = "New description and instructions"] text: String,
        #[description = "Cooking time in minutes"] cooking_time: i64,
        #[description = "Ingredients, e.g. `Flour (g)=200, Egg=2`"] ingredients: String,
        #[description = "Tag slugs, e.g. `breakfast, quick`"] tags: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        let inputs = parse_ingredient_list(&ingredients)?;
        let replacement = NewRecipe {
            name,
            text,
            cooking_time,
            ingredients: resolve_ingredients(db, inputs).await?,
            tag_slugs: parse_tag_list(&tags),
        };

        let updated =
            recipes::update_recipe(db, &data.limits, &user_id, recipe_id, &replacement).await?;
        ctx.say(format!(
            "✏️ Recipe `#{}` updated: **{}**.",
            updated.id, updated.name
        ))
        .await?;
        Ok(())
    }

    /// Deletes one of your recipes.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn recipe_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to delete"]
        #[autocomplete = "autocomplete::autocomplete_recipe"]
        recipe: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let recipe_id = autocomplete::require_recipe_ref(&recipe)?;

        recipes::delete_recipe(db, &user_id, recipe_id).await?;
        ctx.say(format!("🗑️ Recipe `#{recipe_id}` deleted.")).await?;
        Ok(())
    }

    /// Searches the ingredient catalogue by name prefix.
    #[poise::command(slash_command)]
    pub async fn ingredients(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Start of the ingredient name"]
        #[autocomplete = "autocomplete::autocomplete_ingredient"]
        name: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let prefix = name.unwrap_or_default();
        // Autocomplete suggestions carry the unit; search on the bare name.
        let prefix = prefix.split(" (").next().unwrap_or_default();

        let found = ingredient::search_ingredients(db, prefix, MAX_LIST_LIMIT).await?;
        if found.is_empty() {
            ctx.say("No ingredients found.").await?;
            return Ok(());
        }

        let mut response = String::from("**Ingredients**\n");
        for i in &found {
            writeln!(&mut response, "• {} ({})", i.name, i.measurement_unit)?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Lists every tag with its slug.
    #[poise::command(slash_command)]
    pub async fn tags(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let all = tag::get_all_tags(db).await?;
        if all.is_empty() {
            ctx.say("No tags have been defined yet.").await?;
            return Ok(());
        }

        let mut response = String::from("**Tags**\n");
        for t in &all {
            writeln!(&mut response, "• {} (`{}`)", t.name, t.slug)?;
        }
        ctx.say(response).await?;
        Ok(())
    }
}

pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_ingredient_list() {
        let parsed = parse_ingredient_list("Flour (g)=200, Egg=2,  Olive oil ( ml ) = 15 ").unwrap();
        assert_eq!(
            parsed,
            vec![
                IngredientInput {
                    name: "Flour".to_string(),
                    unit: Some("g".to_string()),
                    amount: 200,
                },
                IngredientInput {
                    name: "Egg".to_string(),
                    unit: None,
                    amount: 2,
                },
                IngredientInput {
                    name: "Olive oil".to_string(),
                    unit: Some("ml".to_string()),
                    amount: 15,
                },
            ]
        );
    }

    #[test]
    fn test_parse_ingredient_list_errors() {
        assert!(matches!(
            parse_ingredient_list("Flour 200"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_ingredient_list("Flour=lots"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_ingredient_list(" (g)=5"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_parse_ingredient_list_skips_blank_items() {
        assert!(parse_ingredient_list(" , ,").unwrap().is_empty());
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(
            parse_tag_list(" breakfast, quick ,,"),
            vec!["breakfast".to_string(), "quick".to_string()]
        );
    }
}
