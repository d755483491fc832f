//! Cookie session adapters backed by the cache.
//!
//! - `store` - SessionStore implementation over the cache
//! - `layer` - SessionManagerLayer assembly from configuration
//! - `current_user` - Typed access to the identity a session carries

mod current_user;
mod layer;
mod store;

pub use current_user::{current_user, store_current_user, SESSION_USER_KEY};
pub use layer::build_session_layer;
pub use store::RedisSessionStore;
