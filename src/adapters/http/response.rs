//! Shared HTTP response types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::RepositoryError;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHENTICATED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Maps repository failures onto HTTP responses.
///
/// Malformed ids are the client's fault, duplicates conflict, and backend
/// failures stay in the log; the client only learns that storage misbehaved.
pub fn repository_error_response(err: RepositoryError) -> Response {
    match &err {
        RepositoryError::InvalidId { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(err.to_string())),
        )
            .into_response(),
        RepositoryError::Duplicate { .. } => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(err.to_string())),
        )
            .into_response(),
        RepositoryError::Backend(_) => {
            tracing::error!(error = %err, "Repository operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Storage operation failed")),
            )
                .into_response()
        }
    }
}
