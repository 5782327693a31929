use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    admin_list_rewards, create_reward, leaderboard, list_rewards, my_summary, redeem_reward,
    update_reward, user_achievements,
};
use crate::state::AppState;

/// Mounted at `/api/gamification`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(my_summary))
        .route("/leaderboard", get(leaderboard))
}

/// Mounted at `/api/rewards`.
pub fn reward_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rewards))
        .route("/:id/redeem", post(redeem_reward))
}

/// Merged into `/api/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:username/achievements", get(user_achievements))
}

/// Merged into the API-key protected `/api/admin` router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/rewards", get(admin_list_rewards).post(create_reward))
        .route("/rewards/:id", put(update_reward))
}
