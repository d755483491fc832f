//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `session` - Session touch/identity middleware and extractors

pub mod session;

pub use session::{load_session_user, touch_session, RequireSession, SessionRejection};
