use axum::{
    Router,
    routing::{delete, get},
};

use super::handlers::{add_to_shortlist, get_shortlist, recommendations, remove_from_shortlist};
use crate::state::AppState;

/// Mounted at `/api/scouting`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendations))
        .route("/shortlist", get(get_shortlist).post(add_to_shortlist))
        .route("/shortlist/:username", delete(remove_from_shortlist))
}
