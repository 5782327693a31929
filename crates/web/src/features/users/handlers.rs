use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        user::{ProfileResponse, UpdateProfileRequest, UserSearchFilter, UserSummary},
    },
};
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserSearchFilter),
    responses(
        (status = 200, description = "Matching users", body = PaginatedResponse<UserSummary>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "users"
)]
pub async fn search_users(
    State(db): State<Database>,
    Query(filter): Query<UserSearchFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let (users, total) = services::search(db.pool(), &filter).await?;

    Ok(Json(PaginatedResponse::new(users, filter.page, filter.page_size, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Public profile", body = ProfileResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_profile(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let profile = services::profile(db.pool(), &username).await?;

    Ok(Json(profile).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn update_me(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let profile = services::update_profile(db.pool(), current.id(), &req).await?;

    Ok(Json(profile).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users/{username}/follow",
    params(("username" = String, Path, description = "User to follow")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Following"),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn follow(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    services::follow(&state, &current.user, &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/users/{username}/follow",
    params(("username" = String, Path, description = "User to unfollow")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "No longer following"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not following this user")
    ),
    tag = "users"
)]
pub async fn unfollow(
    State(db): State<Database>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    services::unfollow(db.pool(), current.id(), &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/followers",
    params(
        ("username" = String, Path, description = "Username"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Followers, most recent first", body = PaginatedResponse<UserSummary>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn followers(
    State(db): State<Database>,
    Path(username): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (users, total) = services::followers(db.pool(), &username, &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(users, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/following",
    params(
        ("username" = String, Path, description = "Username"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Accounts the user follows", body = PaginatedResponse<UserSummary>),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn following(
    State(db): State<Database>,
    Path(username): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (users, total) = services::following(db.pool(), &username, &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(users, &pagination, total)).into_response())
}
