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
        media::{CreateStreamRequest, CreateVideoRequest, StreamFilter},
    },
    models::{Stream, StreamStatus, Video},
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/streams",
    request_body = CreateStreamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Stream scheduled", body = Stream),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "media"
)]
pub async fn create_stream(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<CreateStreamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let stream = services::create_stream(db.pool(), current.id(), &req).await?;

    Ok((StatusCode::CREATED, Json(stream)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/streams",
    params(StreamFilter),
    responses(
        (status = 200, description = "Streams, optionally by status", body = PaginatedResponse<Stream>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "media"
)]
pub async fn list_streams(
    State(db): State<Database>,
    Query(filter): Query<StreamFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let (streams, total) = services::list_streams(db.pool(), &filter).await?;

    Ok(Json(PaginatedResponse::from_params(streams, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/streams/{id}",
    params(("id" = Uuid, Path, description = "Stream id")),
    responses(
        (status = 200, description = "Stream", body = Stream),
        (status = 404, description = "Stream not found")
    ),
    tag = "media"
)]
pub async fn get_stream(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let stream = services::get_stream(db.pool(), id).await?;

    Ok(Json(stream).into_response())
}

#[utoipa::path(
    post,
    path = "/api/streams/{id}/start",
    params(("id" = Uuid, Path, description = "Stream id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stream is live", body = Stream),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the host"),
        (status = 404, description = "Stream not found"),
        (status = 409, description = "Stream is not scheduled")
    ),
    tag = "media"
)]
pub async fn start_stream(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let stream = services::transition_stream(db.pool(), id, current.id(), StreamStatus::Live).await?;

    Ok(Json(stream).into_response())
}

#[utoipa::path(
    post,
    path = "/api/streams/{id}/end",
    params(("id" = Uuid, Path, description = "Stream id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stream ended", body = Stream),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the host"),
        (status = 404, description = "Stream not found"),
        (status = 409, description = "Stream is not live")
    ),
    tag = "media"
)]
pub async fn end_stream(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let stream = services::transition_stream(db.pool(), id, current.id(), StreamStatus::Ended).await?;

    Ok(Json(stream).into_response())
}

#[utoipa::path(
    post,
    path = "/api/videos",
    request_body = CreateVideoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Video published", body = Video),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "media"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateVideoRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let video = services::upload_video(&state, current.id(), &req).await?;

    Ok((StatusCode::CREATED, Json(video)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(("id" = Uuid, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video; the view is counted", body = Video),
        (status = 404, description = "Video not found")
    ),
    tag = "media"
)]
pub async fn get_video(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let video = services::watch_video(db.pool(), id).await?;

    Ok(Json(video).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    params(("id" = Uuid, Path, description = "Video id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Video not found")
    ),
    tag = "media"
)]
pub async fn delete_video(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_video(db.pool(), id, current.id()).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/videos",
    params(
        ("username" = String, Path, description = "Username"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Videos by the user, newest first", body = PaginatedResponse<Video>),
        (status = 404, description = "User not found")
    ),
    tag = "media"
)]
pub async fn user_videos(
    State(db): State<Database>,
    Path(username): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (videos, total) = services::videos_by_user(db.pool(), &username, &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(videos, &pagination, total)).into_response())
}
