/// Database configuration and connection management
pub mod database;

/// Group policy settings loading from config.toml
pub mod settings;
