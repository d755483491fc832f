//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid connect timeout")]
    InvalidConnectTimeout,

    #[error("Invalid retry interval")]
    InvalidRetryInterval,

    #[error("Database credentials must not contain '@', ':' or '/'")]
    InvalidDatabaseCredentials,

    #[error("REDIS_URL must be a bare host, not a full URL")]
    InvalidRedisHost,

    #[error("Invalid session cookie name")]
    InvalidCookieName,

    #[error("Session cookie max age must be greater than zero")]
    InvalidCookieMaxAge,

    #[error("Session secret must be at least 32 bytes in production")]
    WeakSessionSecret,
}
