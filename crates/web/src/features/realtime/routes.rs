use axum::{Router, routing::get};

use super::handlers::connect;
use crate::state::AppState;

/// Merged into `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(connect))
}
