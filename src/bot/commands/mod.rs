//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Shopping cart commands, including the shopping list download
pub mod cart;

/// Favorite recipe commands
pub mod favorite;

/// General utility commands
pub mod general;

/// Recipe, ingredient and tag commands
pub mod recipe;

/// Author subscription commands
pub mod subscription;

// Export commands
pub use cart::*;
pub use favorite::*;
pub use general::*;
pub use recipe::*;
pub use subscription::*;

use crate::{bot::BotData, errors::Error};

/// Every top-level command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        recipe(),
        ingredients(),
        tags(),
        cart(),
        favorite(),
        subscribe(),
        unsubscribe(),
        subscriptions(),
    ]
}
