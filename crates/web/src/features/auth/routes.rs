use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{change_password, login, logout, me, register};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password", put(change_password))
}
