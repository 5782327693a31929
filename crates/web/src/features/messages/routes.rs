use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_conversations, list_messages, mark_read, send_message, start_conversation};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_conversations).post(start_conversation))
        .route("/:id/messages", get(list_messages).post(send_message))
        .route("/:id/read", post(mark_read))
}
