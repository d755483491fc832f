//! Route definitions for user endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::AppState;

use super::handlers::{login, signup};

/// Build the user router.
///
/// Routes:
/// - POST /signup - Create an account and start a session
/// - POST /login - Authenticate and start a session
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
