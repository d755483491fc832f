//! User signup and login endpoints.

mod dto;
mod handlers;
mod password;
mod routes;

pub use dto::{LoginRequest, SignupRequest, UserResponse};
pub use password::{hash_password, verify_password, PasswordError};
pub use routes::user_routes;
