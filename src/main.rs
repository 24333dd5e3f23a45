use dotenvy::dotenv;
use recipe_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    core::{ingredient, tag},
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Tracing first so every later step can log
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Non-fatal: env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Application settings (limits, ingredient catalogue)
    let app_settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Ingredient catalogue and recipe tags
    ingredient::seed_ingredients(&db, &app_settings.ingredients)
        .await
        .inspect_err(|e| error!("Failed to seed ingredients: {}", e))?;
    tag::seed_tags(&db, &app_settings.tags)
        .await
        .inspect_err(|e| error!("Failed to seed tags: {}", e))?;

    // 6. Run the bot. The token is read directly before use and never stored.
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, app_settings.limits)).await
}
