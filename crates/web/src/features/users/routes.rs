use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    follow, followers, following, get_profile, search_users, unfollow, update_me,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_users))
        .route("/me", put(update_me))
        .route("/:username", get(get_profile))
        .route("/:username/follow", post(follow).delete(unfollow))
        .route("/:username/followers", get(followers))
        .route("/:username/following", get(following))
}
