//! Application settings loaded from `config.toml`.
//!
//! The file carries the per-line quantity bounds plus the ingredient catalogue and recipe
//! tags that are seeded into the database on startup. Every section is optional; a missing file
//! yields the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Smallest accepted ingredient amount / cooking time
pub const DEFAULT_MIN_AMOUNT: i32 = 1;
/// Largest accepted ingredient amount / cooking time
pub const DEFAULT_MAX_AMOUNT: i32 = 32000;

/// Top-level structure of `config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Quantity bounds
    #[serde(default)]
    pub limits: AmountLimits,
    /// Ingredients to seed on startup
    #[serde(default)]
    pub ingredients: Vec<IngredientSeed>,
    /// Recipe tags to seed on startup
    #[serde(default)]
    pub tags: Vec<TagSeed>,
}

/// Inclusive bounds applied to ingredient amounts and cooking times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AmountLimits {
    /// Lower bound (inclusive), at least 1
    pub min_amount: i32,
    /// Upper bound (inclusive)
    pub max_amount: i32,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            min_amount: DEFAULT_MIN_AMOUNT,
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }
}

impl AmountLimits {
    /// Returns `value` narrowed to `i32` if it lies within the bounds.
    pub fn check(&self, value: i64) -> Result<i32> {
        if value < i64::from(self.min_amount) || value > i64::from(self.max_amount) {
            return Err(Error::InvalidAmount {
                amount: value,
                min: self.min_amount,
                max: self.max_amount,
            });
        }
        i32::try_from(value).map_err(|_| Error::InvalidAmount {
            amount: value,
            min: self.min_amount,
            max: self.max_amount,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.min_amount < 1 {
            return Err(Error::Config {
                message: format!("min_amount must be positive, got {}", self.min_amount),
            });
        }
        if self.min_amount > self.max_amount {
            return Err(Error::Config {
                message: format!(
                    "min_amount ({}) exceeds max_amount ({})",
                    self.min_amount, self.max_amount
                ),
            });
        }
        Ok(())
    }
}

/// A single ingredient catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientSeed {
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
}

/// A single recipe tag entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSeed {
    /// Display name
    pub name: String,
    /// Slug used to reference the tag in commands
    pub slug: String,
}

/// Parses settings from TOML text and validates the limits.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.limits.validate()?;
    Ok(settings)
}

/// Loads settings from `path`. A missing file yields [`Settings::default`].
///
/// # Errors
/// Returns an error if the file exists but cannot be read, is not valid TOML,
/// or its limits are inconsistent.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `RECIPE_BUDDY_CONFIG`, or `./config.toml` when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("RECIPE_BUDDY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
