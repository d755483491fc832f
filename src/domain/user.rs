//! User entity and the session-carried identity.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// A stored user credential record.
///
/// The password is only ever held as a bcrypt hash; the plaintext never
/// reaches the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Object id rendered as a 24-character hex string.
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    password_hash: String,
}

impl NewUser {
    /// Creates a new user input; the username is trimmed and must be
    /// non-empty, the hash must be present.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        let password_hash = password_hash.into();
        if password_hash.is_empty() {
            return Err(ValidationError::empty_field("password_hash"));
        }
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// The identity a session carries once signup or login succeeded.
///
/// Round-trips through the session store as JSON, so it stays small and
/// contains nothing secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}
