//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. The deployment
//! environment uses flat, uppercased variable names (`MONGO_USER`,
//! `REDIS_URL`, `SESSION_SECRET`, `PORT`, ...), so each section
//! deserializes from the same flat source and maps variables onto its
//! fields with serde renames.
//!
//! # Example
//!
//! ```no_run
//! use portcullis::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod redis;
mod server;
mod session;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use session::SessionConfig;

/// Root application configuration
///
/// Contains all configuration sections for the gateway. Load using
/// [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, logging, CORS)
    pub server: ServerConfig,

    /// Document store configuration (MongoDB connection and retry policy)
    pub database: DatabaseConfig,

    /// Session cache configuration (Redis connection)
    pub redis: RedisConfig,

    /// Session middleware configuration (secret, cookie attributes)
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads the flat process environment (no prefix)
    /// 3. Deserializes each section from the shared source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    ///   (`MONGO_USER`, `MONGO_PASSWORD`, `SESSION_SECRET`)
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let source = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let server: ServerConfig = source.clone().try_deserialize()?;
        let database: DatabaseConfig = source.clone().try_deserialize()?;
        let redis: RedisConfig = source.clone().try_deserialize()?;
        let session: SessionConfig = source.try_deserialize()?;

        Ok(Self {
            server,
            database,
            redis,
            session,
        })
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Required values present
    /// - Port and timeout ranges
    /// - Credential characters that would corrupt the connection URL
    /// - Production-specific requirements (session secret strength)
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.session.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
