use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    dto::{
        common::PaginatedResponse,
        notification::{NotificationFilter, UnreadCountResponse},
    },
    models::Notification,
};
use uuid::Uuid;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Notifications, newest first", body = PaginatedResponse<Notification>),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(filter): Query<NotificationFilter>,
) -> Result<Response, WebError> {
    filter.pagination().validate().map_err(WebError::BadRequest)?;

    let (notifications, total) = services::list(&state, current.id(), &filter).await?;

    Ok(Json(PaginatedResponse::new(
        notifications,
        filter.page,
        filter.page_size,
        total,
    ))
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unread notification count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, WebError> {
    let unread = services::unread_count(&state, current.id()).await?;

    Ok(Json(UnreadCountResponse { unread }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::mark_read(&state, id, current.id()).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of notifications marked as read"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, WebError> {
    let marked = services::mark_all_read(&state, current.id()).await?;

    Ok(Json(json!({ "marked": marked })).into_response())
}
