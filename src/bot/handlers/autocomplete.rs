//! Autocomplete handlers for Discord slash command parameters.
//!
//! Recipe names are not unique, so recipe suggestions carry the id as a `#<id>` prefix
//! (e.g. `#12 Pancakes`). Commands accept that form and resolve it with [`parse_recipe_ref`].

use crate::{
    bot::BotData,
    core::{ingredient, recipe, tag},
    errors::{Error, Result},
};

/// Discord caps autocomplete responses at 25 choices
const MAX_CHOICES: u64 = 25;

/// Formats a recipe as an autocomplete choice.
#[must_use]
pub fn format_recipe_ref(id: i64, name: &str) -> String {
    format!("#{id} {name}")
}

/// Extracts the recipe id from `#12 Pancakes`, `#12` or `12`.
#[must_use]
pub fn parse_recipe_ref(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let rest = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Like [`parse_recipe_ref`], but reports unparseable input as a validation error.
pub fn require_recipe_ref(input: &str) -> Result<i64> {
    parse_recipe_ref(input).ok_or_else(|| Error::Validation {
        message: format!("Pick a recipe from the suggestions (got '{input}')"),
    })
}

/// Suggests recipes whose name contains the partial input.
pub async fn autocomplete_recipe(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(recipes) = recipe::search_recipes(db, partial, MAX_CHOICES).await else {
        return Vec::new();
    };

    recipes
        .into_iter()
        .map(|r| format_recipe_ref(r.id, &r.name))
        .collect()
}

/// Suggests ingredients whose name starts with the partial input, as `name (unit)`.
pub async fn autocomplete_ingredient(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(ingredients) = ingredient::search_ingredients(db, partial, MAX_CHOICES).await else {
        return Vec::new();
    };

    ingredients
        .into_iter()
        .map(|i| format!("{} ({})", i.name, i.measurement_unit))
        .collect()
}

/// Suggests tag slugs matching the partial input.
pub async fn autocomplete_tag(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(tags) = tag::get_all_tags(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = tags
        .into_iter()
        .filter(|t| t.slug.contains(&partial_lower) || t.name.to_lowercase().contains(&partial_lower))
        .map(|t| t.slug)
        .take(25)
        .collect();

    matching.sort();
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe_ref() {
        assert_eq!(parse_recipe_ref("#12 Pancakes"), Some(12));
        assert_eq!(parse_recipe_ref("  #7"), Some(7));
        assert_eq!(parse_recipe_ref("42"), Some(42));
        assert_eq!(parse_recipe_ref("Pancakes"), None);
        assert_eq!(parse_recipe_ref("#"), None);
    }

    #[test]
    fn test_require_recipe_ref_rejects_free_text() {
        assert_eq!(require_recipe_ref("#3 Soup").ok(), Some(3));
        assert!(matches!(
            require_recipe_ref("Soup"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let choice = format_recipe_ref(5, "Borscht 2");
        assert_eq!(choice, "#5 Borscht 2");
        assert_eq!(parse_recipe_ref(&choice), Some(5));
    }
}
