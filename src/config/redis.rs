//! Session cache configuration
//!
//! `REDIS_URL` carries the host part only; the full connection URL
//! `redis://<host>:<port>` is assembled here.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Cache host
    #[serde(rename = "redis_url", default = "default_redis_host")]
    pub host: String,

    /// Cache port
    #[serde(rename = "redis_port", default = "default_redis_port")]
    pub port: u16,

    /// Connection timeout in seconds
    #[serde(rename = "redis_connect_timeout_secs", default = "default_timeout")]
    pub connect_timeout_secs: u64,
}

impl RedisConfig {
    /// Build the cache connection URL
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }

    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if self.host.contains("://") {
            return Err(ValidationError::InvalidRedisHost);
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 300 {
            return Err(ValidationError::InvalidConnectTimeout);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            connect_timeout_secs: default_timeout(),
        }
    }
}

fn default_redis_host() -> String {
    "redis".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_timeout() -> u64 {
    5
}
