//! HTTP routes for post endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::AppState;

use super::handlers::{create_post, delete_post, get_post, list_posts, update_post};

/// Creates the posts router.
///
/// # Routes
///
/// - `GET /` - List posts
/// - `POST /` - Create a post
/// - `GET /:id` - Fetch a post
/// - `PATCH /:id` - Update a post
/// - `DELETE /:id` - Delete a post
///
/// Every route requires a logged-in session.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(update_post).delete(delete_post))
}
