//! Ingredient business logic - catalogue lookups, search, and seeding.
//!
//! Ingredients are shared by every recipe. The catalogue is normally seeded from
//! `config.toml` at startup; recipes only reference existing rows.

use crate::{
    config::settings::IngredientSeed,
    entities::{Ingredient, ingredient},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, info};

/// Retrieves every ingredient, ordered alphabetically by name.
pub async fn get_all_ingredients(db: &DatabaseConnection) -> Result<Vec<ingredient::Model>> {
    Ingredient::find()
        .order_by_asc(ingredient::Column::Name)
        .order_by_asc(ingredient::Column::MeasurementUnit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an ingredient by its unique ID.
pub async fn get_ingredient_by_id(
    db: &DatabaseConnection,
    ingredient_id: i64,
) -> Result<Option<ingredient::Model>> {
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds ingredients whose name starts with `prefix`, ordered by name.
///
/// Matching is case-insensitive for ASCII names (`SQLite` `LIKE` semantics).
/// An empty prefix matches everything.
pub async fn search_ingredients(
    db: &DatabaseConnection,
    prefix: &str,
    limit: u64,
) -> Result<Vec<ingredient::Model>> {
    Ingredient::find()
        .filter(ingredient::Column::Name.starts_with(prefix.trim()))
        .order_by_asc(ingredient::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds every ingredient with exactly this name, one per measurement unit.
pub async fn find_ingredients_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Vec<ingredient::Model>> {
    Ingredient::find()
        .filter(ingredient::Column::Name.eq(name.trim()))
        .order_by_asc(ingredient::Column::MeasurementUnit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the ingredient with this exact name and unit, creating it if absent.
///
/// The boolean is `true` when a new row was inserted.
async fn get_or_create_ingredient(
    db: &DatabaseConnection,
    name: &str,
    measurement_unit: &str,
) -> Result<(ingredient::Model, bool)> {
    let name = name.trim();
    let measurement_unit = measurement_unit.trim();

    if name.is_empty() {
        return Err(Error::Validation {
            message: "Ingredient name cannot be empty".to_string(),
        });
    }
    if measurement_unit.is_empty() {
        return Err(Error::Validation {
            message: format!("Ingredient '{name}' needs a measurement unit"),
        });
    }

    let existing = Ingredient::find()
        .filter(ingredient::Column::Name.eq(name))
        .filter(ingredient::Column::MeasurementUnit.eq(measurement_unit))
        .one(db)
        .await?;
    if let Some(found) = existing {
        return Ok((found, false));
    }

    let model = ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(measurement_unit.to_string()),
        ..Default::default()
    };
    Ok((model.insert(db).await?, true))
}

/// Creates an ingredient, or returns the existing one with the same name and unit.
///
/// # Errors
/// Returns [`Error::Validation`] if the name or unit is blank.
pub async fn create_ingredient(
    db: &DatabaseConnection,
    name: &str,
    measurement_unit: &str,
) -> Result<ingredient::Model> {
    get_or_create_ingredient(db, name, measurement_unit)
        .await
        .map(|(model, _)| model)
}

/// Inserts every catalogue entry that is not yet present. Returns how many were created.
pub async fn seed_ingredients(db: &DatabaseConnection, seeds: &[IngredientSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        let (model, inserted) =
            get_or_create_ingredient(db, &seed.name, &seed.measurement_unit).await?;
        if inserted {
            debug!("Seeded ingredient {} ({})", model.name, model.measurement_unit);
            created += 1;
        }
    }
    info!("Seeded {created}/{} ingredients", seeds.len());
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_ingredient_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_ingredient(&db, "  ", "g").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = create_ingredient(&db, "Flour", "").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ingredient_is_get_or_create() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_ingredient(&db, " Flour ", "g").await?;
        let second = create_ingredient(&db, "Flour", "g").await?;
        let other_unit = create_ingredient(&db, "Flour", "kg").await?;

        assert_eq!(first.name, "Flour");
        assert_eq!(first.id, second.id);
        assert_ne!(first.id, other_unit.id);
        assert_eq!(get_all_ingredients(&db).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_ingredients_by_prefix() -> Result<()> {
        let db = setup_test_db().await?;
        create_ingredient(&db, "Sugar", "g").await?;
        create_ingredient(&db, "Salt", "g").await?;
        create_ingredient(&db, "Butter", "g").await?;

        let found = search_ingredients(&db, "s", 10).await?;
        let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Salt", "Sugar"]);

        let exact = find_ingredients_by_name(&db, "Salt").await?;
        assert_eq!(exact.len(), 1);
        assert!(find_ingredients_by_name(&db, "Sal").await?.is_empty());

        let limited = search_ingredients(&db, "", 1).await?;
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name, "Butter");

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_ingredients_counts_only_new_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            IngredientSeed {
                name: "Flour".to_string(),
                measurement_unit: "g".to_string(),
            },
            IngredientSeed {
                name: "Egg".to_string(),
                measurement_unit: "pcs".to_string(),
            },
        ];

        assert_eq!(seed_ingredients(&db, &seeds).await?, 2);
        assert_eq!(seed_ingredients(&db, &seeds).await?, 0);
        assert_eq!(get_all_ingredients(&db).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_ingredient_by_id_missing() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_ingredient_by_id(&db, 42).await?.is_none());
        Ok(())
    }
}
