//! HTTP adapters - REST API surface of the gateway.
//!
//! Each resource has its own module with DTOs, handlers and routes. This
//! module owns the shared application state and assembles the full router
//! with its middleware stack.

pub mod health;
pub mod middleware;
pub mod posts;
pub mod response;
pub mod users;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::info_span;

use crate::config::{AppConfig, ServerConfig};
use crate::ports::{DbHealth, PostsRepository, UsersRepository};

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

/// Shared state handed to every handler.
///
/// Repositories are trait objects so tests can swap in mocks without a
/// running document store.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostsRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub db_health: DbHealth,
}

impl AppState {
    pub fn new(
        posts: Arc<dyn PostsRepository>,
        users: Arc<dyn UsersRepository>,
        db_health: DbHealth,
    ) -> Self {
        Self {
            posts,
            users,
            db_health,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Router Assembly
// ════════════════════════════════════════════════════════════════════════════

/// Build the complete gateway router.
///
/// # Routes
///
/// - `GET /api/v1` - Liveness probe with a fixed body
/// - `GET /api/v1/readyz` - Document store readiness
/// - `/api/v1/posts/*` - Post CRUD (session required)
/// - `/api/v1/users/*` - Signup and login
///
/// The middleware stack, outermost first: request-id stamping, request
/// tracing, request-id propagation, CORS, a request timeout and the
/// session layer. Session state is loaded into request extensions inside
/// the `/api/v1` subtree; when `save_uninitialized` is on, fresh sessions
/// are touched so every visitor receives a cookie.
pub fn gateway_router<S>(
    state: AppState,
    session_layer: SessionManagerLayer<S, SignedCookie>,
    config: &AppConfig,
) -> Router
where
    S: SessionStore + Clone,
{
    let mut api = Router::new()
        .route("/", get(health::liveness))
        .route("/readyz", get(health::readiness))
        .nest("/posts", posts::post_routes())
        .nest("/users", users::user_routes())
        .layer(axum::middleware::from_fn(middleware::load_session_user));

    if config.session.save_uninitialized {
        api = api.layer(axum::middleware::from_fn(middleware::touch_session));
    }

    let trust_proxy = config.server.trust_proxy;
    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(
                    move |request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or("-");
                        let client_ip = if trust_proxy {
                            request
                                .headers()
                                .get("x-forwarded-for")
                                .and_then(|value| value.to_str().ok())
                                .and_then(|value| value.split(',').next())
                                .map(str::trim)
                                .unwrap_or("-")
                        } else {
                            "-"
                        };
                        info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id,
                            client_ip,
                        )
                    },
                ))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&config.server))
                .layer(TimeoutLayer::new(config.server.request_timeout()))
                .layer(session_layer),
        )
}

/// CORS policy from configuration.
///
/// No configured origins means a permissive policy. Configured origins get
/// an explicit allow list with credentials enabled, since session cookies
/// must survive cross-origin requests.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
