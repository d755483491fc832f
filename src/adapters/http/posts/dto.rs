//! HTTP DTOs for post endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::Post;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

/// Request to update a post; absent fields stay unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A post as served over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
        }
    }
}

/// List response carrying the count alongside the posts.
#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub results: usize,
    pub posts: Vec<PostResponse>,
}

impl PostListResponse {
    pub fn new(posts: Vec<Post>) -> Self {
        let posts: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
        Self {
            results: posts.len(),
            posts,
        }
    }
}
