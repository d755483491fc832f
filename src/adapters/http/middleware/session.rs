//! Session middleware and extractors for axum.
//!
//! This module provides:
//! - `touch_session` - Marks fresh sessions so every visitor gets a cookie
//! - `load_session_user` - Injects the session user into request extensions
//! - `RequireSession` - Extractor that requires a logged-in session
//!
//! ```text
//! Request → session layer → touch_session → load_session_user
//!                                                  ↓
//!                              Handler → RequireSession reads extensions
//! ```

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use time::OffsetDateTime;
use tower_sessions::Session;
use tracing::debug;

use crate::adapters::session::current_user;
use crate::domain::SessionUser;

/// Session key marking a session as issued.
const SESSION_TOUCHED_KEY: &str = "_touched";

/// Marks untouched sessions so every visitor gets a cookie.
///
/// Writing the marker dirties fresh sessions, which makes the session
/// layer persist them and issue the cookie even when no handler stores
/// anything. Requests that already carry a session pass through untouched.
pub async fn touch_session(session: Session, request: Request, next: Next) -> Response {
    match session.get::<i64>(SESSION_TOUCHED_KEY).await {
        Ok(None) => {
            let issued_at = OffsetDateTime::now_utc().unix_timestamp();
            if let Err(err) = session.insert(SESSION_TOUCHED_KEY, issued_at).await {
                debug!(error = %err, "Could not mark session as issued");
            }
        }
        Ok(Some(_)) => {}
        Err(err) => {
            debug!(error = %err, "Could not read session marker");
        }
    }
    next.run(request).await
}

/// Resolves the session user once per request and exposes it to handlers
/// through request extensions.
///
/// A missing or unreadable user is not an error at this point; routes that
/// need one enforce it with [`RequireSession`].
pub async fn load_session_user(session: Session, mut request: Request, next: Next) -> Response {
    match current_user(&session).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(err) => {
            debug!(error = %err, "Session user could not be decoded");
        }
    }
    next.run(request).await
}

/// Extractor that requires a logged-in session.
///
/// Returns 401 when the session carries no user, which covers expired
/// sessions, missing cookies and a cache that is currently unreachable.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireSession(user): RequireSession) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionUser);

impl<S> axum::extract::FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<SessionUser>()
                .cloned()
                .map(RequireSession)
                .ok_or(SessionRejection::Unauthenticated)
        })
    }
}

/// Rejection type for requests without a logged-in session.
#[derive(Debug, Clone)]
pub enum SessionRejection {
    /// No logged-in user in the session.
    Unauthenticated,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Login required"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
