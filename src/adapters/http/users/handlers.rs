//! HTTP handlers for user endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bcrypt::DEFAULT_COST;
use tower_sessions::Session;
use tracing::error;

use crate::adapters::http::response::{repository_error_response, ErrorResponse};
use crate::adapters::http::AppState;
use crate::adapters::session::store_current_user;
use crate::domain::{NewUser, SessionUser, ValidationError};

use super::dto::{LoginRequest, SignupRequest, UserResponse};
use super::password::{hash_password, verify_password};

/// POST /api/v1/users/signup - Create an account and log the session in
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignupRequest>,
) -> Response {
    // Validate before burning a bcrypt round on garbage input.
    if req.username.trim().is_empty() {
        return validation_failure(ValidationError::empty_field("username"));
    }
    if req.password.is_empty() {
        return validation_failure(ValidationError::empty_field("password"));
    }

    let password_hash = match hash_password(req.password, DEFAULT_COST).await {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_failure("Account could not be created");
        }
    };

    let new_user = match NewUser::new(req.username, password_hash) {
        Ok(new_user) => new_user,
        Err(e) => return validation_failure(e),
    };

    let user = match state.users.create(new_user).await {
        Ok(user) => user,
        Err(e) => return repository_error_response(e),
    };

    if let Err(e) = store_current_user(&session, &SessionUser::from(&user)).await {
        error!(error = %e, "Could not attach user to session");
        return internal_failure("Session could not be established");
    }

    (StatusCode::CREATED, Json(UserResponse::from(user))).into_response()
}

/// POST /api/v1/users/login - Log an existing user in
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Response {
    let username = req.username.trim();

    let user = match state.users.find_by_username(username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found("User", username)),
            )
                .into_response()
        }
        Err(e) => return repository_error_response(e),
    };

    let verified = match verify_password(req.password, user.password_hash.clone()).await {
        Ok(verified) => verified,
        Err(e) => {
            error!(error = %e, "Password verification failed");
            return internal_failure("Login failed");
        }
    };
    if !verified {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::unauthorized("Incorrect password")),
        )
            .into_response();
    }

    if let Err(e) = store_current_user(&session, &SessionUser::from(&user)).await {
        error!(error = %e, "Could not attach user to session");
        return internal_failure("Session could not be established");
    }

    (StatusCode::OK, Json(UserResponse::from(user))).into_response()
}

fn validation_failure(err: ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(err.to_string())),
    )
        .into_response()
}

fn internal_failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(message)),
    )
        .into_response()
}
