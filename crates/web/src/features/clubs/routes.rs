use axum::{
    Router,
    routing::{delete, get, post},
};

use super::handlers::{
    add_member, add_staff, call_up, remove_member, squad, staff, transfer, user_callups,
    user_transfers,
};
use crate::state::AppState;

/// Mounted at `/api/clubs`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/members", post(add_member))
        .route("/me/members/:username", delete(remove_member))
        .route("/me/staff", post(add_staff))
        .route("/:username/squad", get(squad))
        .route("/:username/staff", get(staff))
}

/// Merged into `/api`.
pub fn top_level_routes() -> Router<AppState> {
    Router::new().route("/transfers", post(transfer))
}

/// Merged into `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/:username/transfers", get(user_transfers))
        .route("/:username/national-team", get(user_callups))
}

/// Mounted at `/api/national-teams` behind the admin key.
pub fn national_team_routes() -> Router<AppState> {
    Router::new().route("/callups", post(call_up))
}
