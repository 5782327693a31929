use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_notifications, mark_all_read, mark_read, unread_count};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
}
