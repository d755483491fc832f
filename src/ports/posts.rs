//! PostsRepository port for post persistence operations

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostPatch, RepositoryError};

/// Repository for managing posts
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// List all posts
    async fn list(&self) -> Result<Vec<Post>, RepositoryError>;

    /// Find a post by its id; `Ok(None)` when no post matches
    async fn find(&self, id: &str) -> Result<Option<Post>, RepositoryError>;

    /// Create a new post and return it with its assigned id
    async fn create(&self, new_post: NewPost) -> Result<Post, RepositoryError>;

    /// Apply a partial update; `Ok(None)` when no post matches
    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, RepositoryError>;

    /// Delete a post; returns whether a post was actually removed
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}
