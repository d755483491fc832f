//! Password hashing on the blocking pool.
//!
//! bcrypt burns tens of milliseconds per call, which would stall the async
//! workers if run inline, so both directions hop onto the blocking pool.

use thiserror::Error;

/// Errors from hashing or verifying passwords.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Hashing task was cancelled")]
    Cancelled,
}

/// Hashes a password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| PasswordError::Cancelled)?
        .map_err(PasswordError::from)
}

/// Verifies a password against a stored hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| PasswordError::Cancelled)?
        .map_err(PasswordError::from)
}
