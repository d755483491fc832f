//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `error` - Validation and repository error types
//! - `post` - Post entity with validated create/update inputs
//! - `user` - User entity and the session-carried identity

pub mod error;
pub mod post;
pub mod user;

pub use error::{RepositoryError, ValidationError};
pub use post::{NewPost, Post, PostPatch};
pub use user::{NewUser, SessionUser, User};
