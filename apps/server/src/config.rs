//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. `dotenvy` loads a `.env` file before this runs.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,

    /// HTTP listen host
    pub host: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Payment provider base URL (sandbox or production)
    pub gateway_base_url: String,

    /// Payment provider server key (basic-auth username)
    pub gateway_server_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./brioche.db".to_string()),

            gateway_base_url: env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://app.sandbox.midtrans.com".to_string()),

            // Empty default keeps local development working; session creation
            // against the real provider will fail until this is set.
            gateway_server_key: env::var("GATEWAY_SERVER_KEY").unwrap_or_default(),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
