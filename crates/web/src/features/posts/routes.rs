use axum::{
    Router,
    routing::{delete, get, post},
};

use super::handlers::{
    add_comment, create_post, delete_comment, delete_post, feed, get_post, like_post,
    list_comments, unlike_post, user_posts,
};
use crate::state::AppState;

/// Mounted at `/api/posts`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/:id", get(get_post).delete(delete_post))
        .route("/:id/comments", get(list_comments).post(add_comment))
        .route("/:id/like", post(like_post).delete(unlike_post))
}

/// Merged into `/api`.
pub fn top_level_routes() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed))
        .route("/comments/:id", delete(delete_comment))
}

/// Merged into `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:username/posts", get(user_posts))
}
