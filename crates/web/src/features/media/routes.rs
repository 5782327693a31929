use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    create_stream, delete_video, end_stream, get_stream, get_video, list_streams, start_stream,
    upload_video, user_videos,
};
use crate::state::AppState;

/// Mounted at `/api/streams`.
pub fn stream_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_streams).post(create_stream))
        .route("/:id", get(get_stream))
        .route("/:id/start", post(start_stream))
        .route("/:id/end", post(end_stream))
}

/// Mounted at `/api/videos`.
pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_video))
        .route("/:id", get(get_video).delete(delete_video))
}

/// Merged into `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:username/videos", get(user_videos))
}
