//! Tag business logic - creation and lookup of recipe tags.
//!
//! Every recipe needs at least one tag. Tags are provisioned from `config.toml` at startup.

use crate::{
    config::settings::TagSeed,
    entities::{Tag, tag},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Returns `true` if `slug` is non-empty and consists only of ASCII letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Retrieves every tag ordered by name.
pub async fn get_all_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>> {
    Tag::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a tag by its slug.
pub async fn get_tag_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<tag::Model>> {
    Tag::find()
        .filter(tag::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new tag.
///
/// # Errors
/// Returns:
/// - [`Error::Validation`] if the name is blank or the slug is malformed
/// - [`Error::AlreadyExists`] if a tag with the same name or slug exists
pub async fn create_tag(db: &DatabaseConnection, name: &str, slug: &str) -> Result<tag::Model> {
    let name = name.trim();
    let slug = slug.trim();

    if name.is_empty() {
        return Err(Error::Validation {
            message: "Tag name cannot be empty".to_string(),
        });
    }
    if !is_valid_slug(slug) {
        return Err(Error::Validation {
            message: format!("Invalid tag slug '{slug}'"),
        });
    }

    let clash = Tag::find()
        .filter(
            Condition::any()
                .add(tag::Column::Name.eq(name))
                .add(tag::Column::Slug.eq(slug)),
        )
        .one(db)
        .await?;
    if clash.is_some() {
        return Err(Error::AlreadyExists {
            message: format!("tag '{name}' / '{slug}'"),
        });
    }

    let model = tag::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates every configured tag whose slug is not yet present. Returns how many were created.
///
/// # Errors
/// Fails on a malformed slug, or when a new slug reuses the name of an existing tag.
pub async fn seed_tags(db: &DatabaseConnection, seeds: &[TagSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        if get_tag_by_slug(db, seed.slug.trim()).await?.is_some() {
            continue;
        }
        let tag = create_tag(db, &seed.name, &seed.slug).await?;
        debug!("Seeded tag {} ({})", tag.name, tag.slug);
        created += 1;
    }
    info!("Seeded {created}/{} tags", seeds.len());
    Ok(created)
}
