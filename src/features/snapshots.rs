use crate::client::PostStore;
use crate::services::snapshot::{NAVIGATION_RESOURCE, POSTS_RESOURCE};
use crate::services::SnapshotPublisher;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<SnapshotPublisher>,
    // mirror of what connected clients hold, fed by the update channel
    pub store: Arc<PostStore>,
}

pub fn snapshot_router() -> Router<AppState> {
    Router::new()
        .route("/__postsync/posts.json", get(posts_handler))
        .route("/__postsync/navigation.json", get(navigation_handler))
        .route("/__postsync/live.json", get(live_handler))
}

async fn posts_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    resource_response(&state.publisher, POSTS_RESOURCE, &headers).await
}

async fn navigation_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    resource_response(&state.publisher, NAVIGATION_RESOURCE, &headers).await
}

#[derive(Serialize)]
struct LiveState {
    initialized: bool,
    posts: usize,
    navigation: Vec<crate::domain::NavItem>,
}

async fn live_handler(State(state): State<AppState>) -> Json<LiveState> {
    Json(LiveState {
        initialized: state.store.is_initialized(),
        posts: state.store.post_count(),
        navigation: state.store.navigation(),
    })
}

// every request rescans; the ETag lets clients skip unchanged bodies
async fn resource_response(
    publisher: &SnapshotPublisher,
    resource_id: &str,
    headers: &HeaderMap,
) -> Response {
    let body = match publisher.resolve(resource_id).await {
        None => return StatusCode::NOT_FOUND.into_response(),
        Some(Err(e)) => {
            error!("Failed to resolve {}: {:#}", resource_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Some(Ok(body)) => body,
    };

    let etag = format!("\"{:016x}\"", xxh3_64(body.as_bytes()));
    let etag_value = match HeaderValue::from_str(&etag) {
        Ok(value) => value,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == etag);

    if not_modified {
        return (
            StatusCode::NOT_MODIFIED,
            [
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
                (header::ETAG, etag_value),
            ],
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            (header::ETAG, etag_value),
        ],
        body,
    )
        .into_response()
}
