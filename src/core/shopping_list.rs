//! Shopping list generation.
//!
//! Turns the recipes in a user's cart into a flat-text list of ingredients to buy. Amounts
//! are summed per aggregation bucket, which is the ingredient's (name, measurement unit)
//! pair rather than its row id, so duplicate catalogue rows still merge into one line.
//!
//! Buckets are emitted in the order their key is first encountered while walking the cart
//! (cart entries in the order they were added, lines in the order they were written).
//! The aggregation itself is pure; [`load_cart_recipes`] is the only part that touches
//! the database and reads everything inside one transaction.

use crate::{
    entities::{Ingredient, RecipeIngredient, ShoppingCart, recipe_ingredient, shopping_cart},
    errors::Result,
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// First line of every shopping list
pub const HEADER: &str = "Shopping list:";
/// MIME type of the exported file
pub const CONTENT_TYPE: &str = "text/plain";
/// File name offered for download
pub const FILENAME: &str = "shopping_list.txt";

/// One ingredient quantity of a recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Quantity for one recipe
    pub amount: i32,
}

impl IngredientLine {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// A recipe from the cart with its ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecipe {
    /// Recipe id
    pub recipe_id: i64,
    /// Ingredient lines in recipe order
    pub lines: Vec<IngredientLine>,
}

/// Total quantity of one bucket across the whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Sum of every matching line amount
    pub total_amount: i64,
}

impl fmt::Display for AggregatedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {}",
            self.name, self.total_amount, self.measurement_unit
        )
    }
}

/// Insertion-ordered accumulator: name, then unit, maps to a slot in `lines`.
#[derive(Debug, Default)]
struct Buckets {
    index: HashMap<String, HashMap<String, usize>>,
    lines: Vec<AggregatedLine>,
}

impl Buckets {
    fn add(&mut self, line: &IngredientLine) {
        let slot = self
            .index
            .get(&line.name)
            .and_then(|units| units.get(&line.measurement_unit))
            .copied();
        if let Some(slot) = slot {
            self.lines[slot].total_amount += i64::from(line.amount);
            return;
        }

        let slot = self.lines.len();
        self.index
            .entry(line.name.clone())
            .or_default()
            .insert(line.measurement_unit.clone(), slot);
        self.lines.push(AggregatedLine {
            name: line.name.clone(),
            measurement_unit: line.measurement_unit.clone(),
            total_amount: i64::from(line.amount),
        });
    }
}

/// Sums ingredient amounts per (name, unit) bucket, in order of first appearance.
#[must_use]
pub fn aggregate(recipes: &[CartRecipe]) -> Vec<AggregatedLine> {
    let mut buckets = Buckets::default();
    for line in recipes.iter().flat_map(|r| &r.lines) {
        buckets.add(line);
    }
    debug!(
        "Aggregated {} recipes into {} shopping list lines",
        recipes.len(),
        buckets.lines.len()
    );
    buckets.lines
}

/// Renders aggregated lines as the shopping list text: header, blank line, one line per bucket.
#[must_use]
pub fn render(lines: &[AggregatedLine]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 2 + lines.len() * 24);
    out.push_str(HEADER);
    out.push_str("\n\n");
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Produces the shopping list text for the given cart contents.
#[must_use]
pub fn generate(recipes: &[CartRecipe]) -> String {
    render(&aggregate(recipes))
}

/// A rendered shopping list ready for delivery as a file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListFile {
    /// UTF-8 report body
    pub body: String,
    /// MIME type to attach to the download
    pub content_type: &'static str,
    /// File name to offer for the download
    pub filename: &'static str,
}

impl ShoppingListFile {
    /// Wraps a rendered report with the `text/plain` / `shopping_list.txt` metadata.
    #[must_use]
    pub const fn new(body: String) -> Self {
        Self {
            body,
            content_type: CONTENT_TYPE,
            filename: FILENAME,
        }
    }

    /// Value for a `Content-Disposition` header.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Reads the user's cart with every recipe's ingredient lines in one transaction.
///
/// Cart recipes come back in the order they were added; each recipe's lines in the
/// order they were written. Recipes without lines are kept with an empty line list.
pub async fn load_cart_recipes(db: &DatabaseConnection, user_id: &str) -> Result<Vec<CartRecipe>> {
    let txn = db.begin().await?;

    let entries = ShoppingCart::find()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .order_by_asc(shopping_cart::Column::Id)
        .all(&txn)
        .await?;
    let recipe_ids: Vec<i64> = entries.iter().map(|e| e.recipe_id).collect();

    let rows = if recipe_ids.is_empty() {
        Vec::new()
    } else {
        RecipeIngredient::find()
            .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .order_by_asc(recipe_ingredient::Column::Id)
            .find_also_related(Ingredient)
            .all(&txn)
            .await?
    };
    txn.commit().await?;

    let mut lines_by_recipe: HashMap<i64, Vec<IngredientLine>> = HashMap::new();
    for (line, ingredient) in rows {
        let Some(ingredient) = ingredient else {
            warn!(
                "Recipe line {} references missing ingredient {}",
                line.id, line.ingredient_id
            );
            continue;
        };
        lines_by_recipe
            .entry(line.recipe_id)
            .or_default()
            .push(IngredientLine {
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: line.amount,
            });
    }

    Ok(recipe_ids
        .into_iter()
        .map(|recipe_id| CartRecipe {
            recipe_id,
            lines: lines_by_recipe.remove(&recipe_id).unwrap_or_default(),
        })
        .collect())
}

/// Builds the downloadable shopping list for `user_id`.
pub async fn export_shopping_list(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<ShoppingListFile> {
    let recipes = load_cart_recipes(db, user_id).await?;
    Ok(ShoppingListFile::new(generate(&recipes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn recipe(recipe_id: i64, lines: &[(&str, &str, i32)]) -> CartRecipe {
        CartRecipe {
            recipe_id,
            lines: lines
                .iter()
                .map(|&(name, unit, amount)| IngredientLine::new(name, unit, amount))
                .collect(),
        }
    }

    fn triples(lines: &[AggregatedLine]) -> Vec<(String, String, i64)> {
        let mut out: Vec<_> = lines
            .iter()
            .map(|l| (l.name.clone(), l.measurement_unit.clone(), l.total_amount))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_empty_cart_is_header_only() {
        assert_eq!(generate(&[]), "Shopping list:\n\n");
    }

    #[test]
    fn test_recipe_without_lines_contributes_nothing() {
        let cart = vec![recipe(1, &[]), recipe(2, &[("Salt", "g", 5)])];
        assert_eq!(generate(&cart), "Shopping list:\n\nSalt - 5 g\n");
    }

    #[test]
    fn test_flour_and_egg_scenario() {
        let cart = vec![
            recipe(1, &[("Flour", "g", 200)]),
            recipe(2, &[("Flour", "g", 300), ("Egg", "pcs", 2)]),
        ];
        assert_eq!(
            generate(&cart),
            "Shopping list:\n\nFlour - 500 g\nEgg - 2 pcs\n"
        );
    }

    #[test]
    fn test_shared_bucket_sums() {
        let cart = vec![
            recipe(1, &[("Sugar", "g", 100)]),
            recipe(2, &[("Sugar", "g", 250)]),
        ];
        let lines = aggregate(&cart);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].total_amount, 350);
    }

    #[test]
    fn test_disjoint_ingredients_one_line_each() {
        let cart = vec![
            recipe(1, &[("Rice", "g", 300), ("Water", "ml", 600)]),
            recipe(2, &[("Apple", "pcs", 3)]),
        ];
        let lines = aggregate(&cart);
        assert_eq!(
            triples(&lines),
            vec![
                ("Apple".to_string(), "pcs".to_string(), 3),
                ("Rice".to_string(), "g".to_string(), 300),
                ("Water".to_string(), "ml".to_string(), 600),
            ]
        );
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let cart = vec![
            recipe(1, &[("Milk", "ml", 200)]),
            recipe(2, &[("Milk", "cup", 1)]),
        ];
        assert_eq!(
            generate(&cart),
            "Shopping list:\n\nMilk - 200 ml\nMilk - 1 cup\n"
        );
    }

    #[test]
    fn test_interleaved_units_accumulate_into_own_bucket() {
        let cart = vec![
            recipe(1, &[("Milk", "ml", 200), ("Milk", "cup", 1)]),
            recipe(2, &[("Sugar", "g", 5), ("Milk", "ml", 50), ("Milk", "cup", 2)]),
        ];
        assert_eq!(
            generate(&cart),
            "Shopping list:\n\nMilk - 250 ml\nMilk - 3 cup\nSugar - 5 g\n"
        );
    }

    #[test]
    fn test_large_amounts_do_not_wrap() {
        let cart = vec![
            recipe(1, &[("Rice", "g", 32000)]),
            recipe(2, &[("Rice", "g", 32000)]),
        ];
        let lines = aggregate(&cart);
        assert_eq!(lines[0].total_amount, 64000);

        let many: Vec<_> = (0..100_000)
            .map(|i| recipe(i, &[("Rice", "g", i32::MAX)]))
            .collect();
        assert_eq!(aggregate(&many)[0].total_amount, i64::from(i32::MAX) * 100_000);
    }

    #[test]
    fn test_output_is_idempotent() {
        let cart = vec![
            recipe(1, &[("Flour", "g", 200), ("Egg", "pcs", 1)]),
            recipe(2, &[("Egg", "pcs", 3)]),
        ];
        assert_eq!(generate(&cart), generate(&cart));
    }

    #[test]
    fn test_permutation_keeps_totals() {
        let a = recipe(1, &[("Flour", "g", 200), ("Egg", "pcs", 1)]);
        let b = recipe(2, &[("Egg", "pcs", 3), ("Milk", "ml", 250)]);
        let c = recipe(3, &[("Milk", "ml", 50), ("Flour", "g", 10)]);

        let forward = aggregate(&[a.clone(), b.clone(), c.clone()]);
        let backward = aggregate(&[c, b, a]);

        assert_eq!(triples(&forward), triples(&backward));
        assert_eq!(forward[0].name, "Flour");
        assert_eq!(backward[0].name, "Milk");
    }

    #[test]
    fn test_file_metadata() {
        let file = ShoppingListFile::new(generate(&[]));
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.filename, "shopping_list.txt");
        assert_eq!(
            file.content_disposition(),
            "attachment; filename=\"shopping_list.txt\""
        );
    }

    #[tokio::test]
    async fn test_export_empty_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let file = export_shopping_list(&db, "nobody").await?;
        assert_eq!(file.body, "Shopping list:\n\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_from_database() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_test_ingredient(&db, "Flour", "g").await?;
        let egg = create_test_ingredient(&db, "Egg", "pcs").await?;

        let bread = create_test_recipe(&db, "Bread", &[(flour.id, 200)]).await?;
        let cake = create_test_recipe(&db, "Cake", &[(flour.id, 300), (egg.id, 2)]).await?;
        let other = create_test_recipe(&db, "Omelette", &[(egg.id, 4)]).await?;

        crate::core::cart::add_to_cart(&db, "user1", bread.id).await?;
        crate::core::cart::add_to_cart(&db, "user1", cake.id).await?;
        crate::core::cart::add_to_cart(&db, "user2", other.id).await?;

        let file = export_shopping_list(&db, "user1").await?;
        assert_eq!(file.body, "Shopping list:\n\nFlour - 500 g\nEgg - 2 pcs\n");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_rows_merge() -> Result<()> {
        let db = setup_test_db().await?;
        let sugar_a = insert_raw_ingredient(&db, "Sugar", "g").await?;
        let sugar_b = insert_raw_ingredient(&db, "Sugar", "g").await?;
        assert_ne!(sugar_a.id, sugar_b.id);

        let jam = create_test_recipe(&db, "Jam", &[(sugar_a.id, 100)]).await?;
        let pie = create_test_recipe(&db, "Pie", &[(sugar_b.id, 250)]).await?;
        crate::core::cart::add_to_cart(&db, "user1", jam.id).await?;
        crate::core::cart::add_to_cart(&db, "user1", pie.id).await?;

        let recipes = load_cart_recipes(&db, "user1").await?;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].recipe_id, jam.id);

        let file = export_shopping_list(&db, "user1").await?;
        assert_eq!(file.body, "Shopping list:\n\nSugar - 350 g\n");

        Ok(())
    }

    #[tokio::test]
    async fn test_export_max_amounts_sum_without_truncation() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = create_test_ingredient(&db, "Rice", "g").await?;
        let a = create_test_recipe(&db, "Risotto", &[(rice.id, 32000)]).await?;
        let b = create_test_recipe(&db, "Pilaf", &[(rice.id, 32000)]).await?;
        crate::core::cart::add_to_cart(&db, "user1", a.id).await?;
        crate::core::cart::add_to_cart(&db, "user1", b.id).await?;

        let file = export_shopping_list(&db, "user1").await?;
        assert_eq!(file.body, "Shopping list:\n\nRice - 64000 g\n");

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_recipe_without_lines_is_kept() -> Result<()> {
        let db = setup_test_db().await?;
        let empty = create_test_recipe(&db, "Air", &[]).await?;
        crate::core::cart::add_to_cart(&db, "user1", empty.id).await?;

        let recipes = load_cart_recipes(&db, "user1").await?;
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].lines.is_empty());
        assert_eq!(generate(&recipes), "Shopping list:\n\n");

        Ok(())
    }
}
