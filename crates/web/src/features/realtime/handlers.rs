use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::services;
use crate::error::WebError;
use crate::middleware::session::resolve_session;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SocketParams {
    /// Session token; browsers cannot set headers on WebSocket requests
    pub token: String,
}

#[utoipa::path(
    get,
    path = "/api/ws",
    params(SocketParams),
    responses(
        (status = 101, description = "Switched to WebSocket"),
        (status = 401, description = "Invalid or expired session")
    ),
    tag = "realtime"
)]
pub async fn connect(
    State(state): State<AppState>,
    Query(params): Query<SocketParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, WebError> {
    let current = resolve_session(&state.db, &params.token).await?;
    let user_id = current.id();
    let hub = state.hub.clone();

    Ok(ws
        .on_upgrade(move |socket| services::run_socket(socket, hub, user_id))
        .into_response())
}
