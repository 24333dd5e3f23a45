/// Database connection and schema creation
pub mod database;

/// `config.toml` loading: quantity limits and the ingredient catalogue
pub mod settings;
