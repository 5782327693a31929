use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    create_tournament, get_tournament, list_tournaments, record_result, register_team,
    standings, start_tournament, update_status,
};
use crate::state::AppState;

/// Mounted at `/api/tournaments`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tournaments).post(create_tournament))
        .route("/:slug", get(get_tournament))
        .route("/:slug/status", put(update_status))
        .route("/:slug/teams", post(register_team))
        .route("/:slug/start", post(start_tournament))
        .route("/:slug/standings", get(standings))
}

/// Mounted at `/api/matches`.
pub fn match_routes() -> Router<AppState> {
    Router::new().route("/:id/result", post(record_result))
}
