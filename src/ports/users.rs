//! UsersRepository port for user credential persistence

use async_trait::async_trait;

use crate::domain::{NewUser, RepositoryError, User};

/// Repository for managing user credentials
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Create a new user; fails with [`RepositoryError::Duplicate`] when the
    /// username is already taken
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// Find a user by username; `Ok(None)` when no user matches
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}
