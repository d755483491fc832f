//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PostsRepository` - Post persistence
//! - `UsersRepository` - User credential persistence
//! - `DbHealth` - Readiness signal fed by the database connector

mod posts;
mod readiness;
mod users;

pub use posts::PostsRepository;
pub use readiness::{ConnectionState, DbHealth};
pub use users::UsersRepository;
