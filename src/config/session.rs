//! Session middleware configuration
//!
//! Cookie flags are deployment decisions, not fixed contract: every
//! attribute can be overridden through the environment. The defaults match
//! a development deployment behind a reverse proxy (signed, HTTP-only,
//! non-secure, 30 second cookie, issued even for untouched sessions).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Session middleware configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Shared secret the cookie signing key is derived from
    #[serde(rename = "session_secret")]
    pub secret: SecretString,

    /// Session cookie name
    #[serde(rename = "session_cookie_name", default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the cookie Secure (HTTPS only)
    #[serde(rename = "session_cookie_secure", default)]
    pub cookie_secure: bool,

    /// Mark the cookie HttpOnly
    #[serde(rename = "session_cookie_http_only", default = "default_http_only")]
    pub cookie_http_only: bool,

    /// Cookie max age in milliseconds; also the session inactivity TTL
    #[serde(rename = "session_cookie_max_age_ms", default = "default_max_age_ms")]
    pub cookie_max_age_ms: u64,

    /// Issue a cookie even when handlers never touch the session
    #[serde(rename = "session_save_uninitialized", default = "default_save_uninitialized")]
    pub save_uninitialized: bool,
}

impl SessionConfig {
    /// Cookie max age as a `time::Duration` (what the session layer speaks)
    pub fn max_age(&self) -> time::Duration {
        time::Duration::milliseconds(self.cookie_max_age_ms as i64)
    }

    /// Validate session configuration
    ///
    /// Weak secrets are rejected only in production; development setups
    /// commonly use short throwaway values.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("SESSION_SECRET"));
        }
        if *environment == Environment::Production && self.secret.expose_secret().len() < 32 {
            return Err(ValidationError::WeakSessionSecret);
        }
        if self.cookie_name.is_empty() {
            return Err(ValidationError::InvalidCookieName);
        }
        if self.cookie_max_age_ms == 0 {
            return Err(ValidationError::InvalidCookieMaxAge);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::new(String::new()),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            cookie_http_only: default_http_only(),
            cookie_max_age_ms: default_max_age_ms(),
            save_uninitialized: default_save_uninitialized(),
        }
    }
}

fn default_cookie_name() -> String {
    "id".to_string()
}

fn default_http_only() -> bool {
    true
}

fn default_max_age_ms() -> u64 {
    30_000
}

fn default_save_uninitialized() -> bool {
    true
}
