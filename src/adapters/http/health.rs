//! Liveness and readiness handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::ports::ConnectionState;

use super::AppState;

const LIVENESS_BODY: &str = "<h2>Hi There!!!</h2>";

/// GET /api/v1 - Liveness probe.
///
/// Answers from memory with a fixed body and deliberately touches neither
/// the document store nor the cache, so it stays green while dependencies
/// are down.
pub async fn liveness() -> Html<&'static str> {
    debug!("Liveness probe");
    Html(LIVENESS_BODY)
}

/// GET /api/v1/readyz - Readiness probe.
///
/// Reports the document store connection state so orchestration can hold
/// traffic until the first ping succeeds.
pub async fn readiness(State(state): State<AppState>) -> Response {
    let (status, label) = match state.db_health.state() {
        ConnectionState::Ready => (StatusCode::OK, "ready"),
        ConnectionState::Connecting => (StatusCode::SERVICE_UNAVAILABLE, "connecting"),
        ConnectionState::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
    };
    (status, Json(serde_json::json!({ "status": label }))).into_response()
}
