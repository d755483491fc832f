//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum REST API and middleware stack
//! - `mongo` - Document store repositories and connection monitor
//! - `session` - Signed-cookie sessions backed by the cache

pub mod http;
pub mod mongo;
pub mod session;

pub use http::{gateway_router, AppState};
pub use mongo::{build_client, spawn_monitor, RetryPolicy};
pub use session::{build_session_layer, RedisSessionStore};
