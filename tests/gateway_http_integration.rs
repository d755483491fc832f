//! Integration tests for the gateway HTTP surface.
//!
//! These tests drive the fully assembled router, middleware stack
//! included, with in-memory sessions and mock repositories:
//! 1. Liveness and readiness probes
//! 2. Session issuance, signup, login and expiry
//! 3. Session-gated post CRUD and validation failures

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::sync::watch;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use portcullis::adapters::http::AppState;
use portcullis::adapters::{build_session_layer, gateway_router};
use portcullis::config::{AppConfig, DatabaseConfig, RedisConfig, ServerConfig, SessionConfig};
use portcullis::domain::{NewPost, NewUser, Post, PostPatch, RepositoryError, User};
use portcullis::ports::{ConnectionState, DbHealth, PostsRepository, UsersRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory posts repository with object-id shaped ids
struct MockPostsRepository {
    posts: Mutex<Vec<Post>>,
    next_id: AtomicU64,
}

impl MockPostsRepository {
    fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn object_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Reject ids the real repository could not parse as object ids
fn check_object_id(entity: &'static str, id: &str) -> Result<(), RepositoryError> {
    if id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(RepositoryError::invalid_id(entity, id))
    }
}

#[async_trait]
impl PostsRepository for MockPostsRepository {
    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Post>, RepositoryError> {
        check_object_id("post", id)?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepositoryError> {
        let post = Post {
            id: self.object_id(),
            title: new_post.title().to_string(),
            body: new_post.body().to_string(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, RepositoryError> {
        check_object_id("post", id)?;
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title() {
            post.title = title.to_string();
        }
        if let Some(body) = patch.body() {
            post.body = body.to_string();
        }
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        check_object_id("post", id)?;
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

/// In-memory users repository enforcing unique usernames
struct MockUsersRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicU64,
}

impl MockUsersRepository {
    fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed a user with a real (minimum cost) bcrypt hash
    fn with_user(username: &str, password: &str) -> Self {
        let repo = Self::new();
        // 4 is bcrypt's minimum cost; the crate keeps MIN_COST private.
        let hash = bcrypt::hash(password, 4).unwrap();
        repo.users.lock().unwrap().push(User {
            id: repo.object_id(),
            username: username.to_string(),
            password_hash: hash,
        });
        repo
    }

    fn object_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl UsersRepository for MockUsersRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == new_user.username()) {
            return Err(RepositoryError::duplicate("user", new_user.username()));
        }
        let user = User {
            id: self.object_id(),
            username: new_user.username().to_string(),
            password_hash: new_user.password_hash().to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        redis: RedisConfig::default(),
        session: SessionConfig {
            secret: SecretString::new("integration-test-secret".to_string()),
            ..Default::default()
        },
    }
}

fn app_state(
    posts: Arc<dyn PostsRepository>,
    users: Arc<dyn UsersRepository>,
) -> (AppState, watch::Sender<ConnectionState>) {
    let (status, health) = DbHealth::channel();
    (AppState::new(posts, users, health), status)
}

fn test_state() -> (AppState, watch::Sender<ConnectionState>) {
    app_state(
        Arc::new(MockPostsRepository::new()),
        Arc::new(MockUsersRepository::new()),
    )
}

fn build_app(state: AppState, config: &AppConfig) -> Router {
    let session_layer = build_session_layer(MemoryStore::default(), &config.session);
    gateway_router(state, session_layer, config)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Extract the `name=value` part of the issued session cookie
fn session_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Sign a user up and return the session cookie
async fn signup(app: &Router, username: &str, password: &str) -> String {
    let response = request(
        app,
        "POST",
        "/api/v1/users/signup",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response).expect("signup sets a session cookie")
}

// =============================================================================
// Probes
// =============================================================================

#[tokio::test]
async fn test_liveness_serves_exact_body() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h2>Hi There!!!</h2>");
}

#[tokio::test]
async fn test_liveness_ignores_database_outage() {
    let (state, status) = test_state();
    status.send(ConnectionState::Unavailable).unwrap();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_follows_connection_state() {
    let (state, status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1/readyz", None, None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "connecting");

    status.send(ConnectionState::Ready).unwrap();

    let response = request(&app, "GET", "/api/v1/readyz", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v2", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1", None, None).await;

    assert!(response.headers().contains_key("x-request-id"));
}

// =============================================================================
// Session Issuance
// =============================================================================

#[tokio::test]
async fn test_uninitialized_visitor_receives_cookie() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1", None, None).await;

    let cookie = session_cookie(&response).expect("visitor cookie issued");
    assert!(cookie.starts_with("id="));

    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    let attributes = raw.split_once(';').map(|(_, rest)| rest).unwrap_or("");
    assert!(attributes.contains("HttpOnly"));
    assert!(!attributes.contains("Secure"));
}

#[tokio::test]
async fn test_save_uninitialized_off_issues_no_cookie() {
    let (state, _status) = test_state();
    let mut config = test_config();
    config.session.save_uninitialized = false;
    let app = build_app(state, &config);

    let response = request(&app, "GET", "/api/v1", None, None).await;

    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_tampered_cookie_is_ignored() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    let cookie = signup(&app, "mallory", "secret-pw").await;

    let forged = format!("{cookie}x");
    let response = request(&app, "GET", "/api/v1/posts", Some(&forged), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_idle_session_expires() {
    let (state, _status) = test_state();
    let mut config = test_config();
    config.session.cookie_max_age_ms = 300;
    let app = build_app(state, &config);
    let cookie = signup(&app, "sleepy", "nap-time").await;

    let response = request(&app, "GET", "/api/v1/posts", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(700)).await;

    let response = request(&app, "GET", "/api/v1/posts", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_signup_logs_the_session_in() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(
        &app,
        "POST",
        "/api/v1/users/signup",
        None,
        Some(json!({ "username": "ada", "password": "hunter2" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).expect("signup sets a session cookie");
    let body = body_json(response).await;
    assert_eq!(body["username"], "ada");
    assert!(body.get("password_hash").is_none());

    let response = request(&app, "GET", "/api/v1/posts", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["results"], 0);
}

#[tokio::test]
async fn test_signup_requires_username_and_password() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(
        &app,
        "POST",
        "/api/v1/users/signup",
        None,
        Some(json!({ "username": "   ", "password": "pw" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = request(
        &app,
        "POST",
        "/api/v1/users/signup",
        None,
        Some(json!({ "username": "someone", "password": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    signup(&app, "taken", "first-pw").await;

    let response = request(
        &app,
        "POST",
        "/api/v1/users/signup",
        None,
        Some(json!({ "username": "taken", "password": "second-pw" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn test_login_flow() {
    let users = Arc::new(MockUsersRepository::with_user("grace", "correct-horse"));
    let (state, _status) = app_state(Arc::new(MockPostsRepository::new()), users);
    let app = build_app(state, &test_config());

    let response = request(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "nobody", "password": "whatever" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = request(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "grace", "password": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");

    let response = request(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({ "username": "grace", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("login sets a session cookie");
    assert_eq!(body_json(response).await["username"], "grace");

    let response = request(&app, "GET", "/api/v1/posts", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Posts
// =============================================================================

#[tokio::test]
async fn test_posts_require_session() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());

    let response = request(&app, "GET", "/api/v1/posts", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_post_crud_round_trip() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    let cookie = signup(&app, "crud", "secret-pw").await;

    let response = request(
        &app,
        "POST",
        "/api/v1/posts",
        Some(&cookie),
        Some(json!({ "title": "First", "body": "Hello" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "First");

    let response = request(&app, "GET", "/api/v1/posts", Some(&cookie), None).await;
    let listed = body_json(response).await;
    assert_eq!(listed["results"], 1);
    assert_eq!(listed["posts"][0]["id"], id.as_str());

    let response = request(&app, "GET", &format!("/api/v1/posts/{id}"), Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        &app,
        "PATCH",
        &format!("/api/v1/posts/{id}"),
        Some(&cookie),
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await;
    assert_eq!(patched["title"], "Renamed");
    assert_eq!(patched["body"], "Hello");

    let response = request(
        &app,
        "DELETE",
        &format!("/api/v1/posts/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = request(&app, "GET", &format!("/api/v1/posts/{id}"), Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = request(
        &app,
        "DELETE",
        &format!("/api/v1/posts/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    let cookie = signup(&app, "writer", "secret-pw").await;

    let response = request(
        &app,
        "POST",
        "/api/v1/posts",
        Some(&cookie),
        Some(json!({ "title": "   ", "body": "text" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    let cookie = signup(&app, "editor", "secret-pw").await;

    let response = request(
        &app,
        "POST",
        "/api/v1/posts",
        Some(&cookie),
        Some(json!({ "title": "Keep", "body": "me" })),
    )
    .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = request(
        &app,
        "PATCH",
        &format!("/api/v1/posts/{id}"),
        Some(&cookie),
        Some(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_post_id_is_rejected() {
    let (state, _status) = test_state();
    let app = build_app(state, &test_config());
    let cookie = signup(&app, "prober", "secret-pw").await;

    let response = request(
        &app,
        "GET",
        "/api/v1/posts/not-an-object-id",
        Some(&cookie),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
