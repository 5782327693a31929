use axum::{
    Router,
    routing::{delete, get, post},
};

use super::handlers::{delete_post, list_users, stats, suspend_user, unsuspend_user, verify_user};
use crate::features::{gamification, shop};
use crate::state::AppState;

/// Mounted at `/api/admin`; the caller wraps it in the admin key check.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users", get(list_users))
        .route("/users/:username/suspend", post(suspend_user))
        .route("/users/:username/unsuspend", post(unsuspend_user))
        .route("/users/:username/verify", post(verify_user))
        .route("/posts/:id", delete(delete_post))
        .merge(shop::routes::admin_routes())
        .merge(gamification::routes::admin_routes())
}
