use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    Database,
    dto::{
        admin::{AdminUserEntry, PlatformStats},
        common::{PaginatedResponse, PaginationParams},
    },
};
use uuid::Uuid;

use super::services;
use crate::error::WebError;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Platform counters", body = PlatformStats),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn stats(State(db): State<Database>) -> Result<Response, WebError> {
    let stats = services::stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationParams),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Every account, newest first", body = PaginatedResponse<AdminUserEntry>),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(db): State<Database>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (users, total) = services::users(db.pool(), &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(users, &pagination, total)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{username}/suspend",
    params(("username" = String, Path, description = "Username")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Account suspended and sessions revoked"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn suspend_user(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let revoked = services::suspend(db.pool(), &username).await?;

    Ok(Json(json!({ "revoked_sessions": revoked })).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{username}/unsuspend",
    params(("username" = String, Path, description = "Username")),
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Account reactivated"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn unsuspend_user(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    services::unsuspend(db.pool(), &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{username}/verify",
    params(("username" = String, Path, description = "Username")),
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Profile marked verified"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn verify_user(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    services::verify(db.pool(), &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Post removed"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Post not found")
    ),
    tag = "admin"
)]
pub async fn delete_post(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_post(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
