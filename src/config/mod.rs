/// Database configuration and connection management
pub mod database;

/// Seeding and ledger configuration from config.toml
pub mod ledger;
