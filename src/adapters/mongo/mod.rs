//! Document store adapters.
//!
//! - `connector` - Driver client construction and the retrying ping monitor
//! - `posts` - PostsRepository implementation
//! - `users` - UsersRepository implementation

mod connector;
mod posts;
mod users;

pub use connector::{build_client, spawn_monitor, RetryPolicy};
pub use posts::MongoPostsRepository;
pub use users::MongoUsersRepository;
