//! HTTP adapter for post endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};
pub use routes::post_routes;
