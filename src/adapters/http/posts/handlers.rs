//! HTTP handlers for post endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireSession;
use crate::adapters::http::response::{repository_error_response, ErrorResponse};
use crate::adapters::http::AppState;
use crate::domain::{NewPost, PostPatch};

use super::dto::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};

/// GET /api/v1/posts - List all posts
pub async fn list_posts(
    State(state): State<AppState>,
    RequireSession(_user): RequireSession,
) -> Response {
    match state.posts.list().await {
        Ok(posts) => (StatusCode::OK, Json(PostListResponse::new(posts))).into_response(),
        Err(e) => repository_error_response(e),
    }
}

/// GET /api/v1/posts/:id - Fetch one post
pub async fn get_post(
    State(state): State<AppState>,
    RequireSession(_user): RequireSession,
    Path(id): Path<String>,
) -> Response {
    match state.posts.find(&id).await {
        Ok(Some(post)) => (StatusCode::OK, Json(PostResponse::from(post))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Post", &id)),
        )
            .into_response(),
        Err(e) => repository_error_response(e),
    }
}

/// POST /api/v1/posts - Create a post
pub async fn create_post(
    State(state): State<AppState>,
    RequireSession(_user): RequireSession,
    Json(req): Json<CreatePostRequest>,
) -> Response {
    let new_post = match NewPost::new(req.title, req.body) {
        Ok(new_post) => new_post,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    match state.posts.create(new_post).await {
        Ok(post) => (StatusCode::CREATED, Json(PostResponse::from(post))).into_response(),
        Err(e) => repository_error_response(e),
    }
}

/// PATCH /api/v1/posts/:id - Partially update a post
pub async fn update_post(
    State(state): State<AppState>,
    RequireSession(_user): RequireSession,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Response {
    let patch = match PostPatch::new(req.title, req.body) {
        Ok(patch) => patch,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    match state.posts.update(&id, patch).await {
        Ok(Some(post)) => (StatusCode::OK, Json(PostResponse::from(post))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Post", &id)),
        )
            .into_response(),
        Err(e) => repository_error_response(e),
    }
}

/// DELETE /api/v1/posts/:id - Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    RequireSession(_user): RequireSession,
    Path(id): Path<String>,
) -> Response {
    match state.posts.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Post", &id)),
        )
            .into_response(),
        Err(e) => repository_error_response(e),
    }
}
