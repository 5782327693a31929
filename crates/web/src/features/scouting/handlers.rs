use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::scouting::{RecommendationEntry, RecommendationQuery, ShortlistEntry, ShortlistRequest},
};
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;

#[utoipa::path(
    get,
    path = "/api/scouting/recommendations",
    params(RecommendationQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Athletes ranked by score, with breakdown", body = Vec<RecommendationEntry>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role cannot scout")
    ),
    tag = "scouting"
)]
pub async fn recommendations(
    State(db): State<Database>,
    current: CurrentUser,
    Query(query): Query<RecommendationQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let entries = services::recommendations(db.pool(), &current.user, &query).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scouting/shortlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved players, newest first", body = Vec<ShortlistEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role cannot scout")
    ),
    tag = "scouting"
)]
pub async fn get_shortlist(
    State(db): State<Database>,
    current: CurrentUser,
) -> Result<Response, WebError> {
    let entries = services::shortlist(db.pool(), &current.user).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    post,
    path = "/api/scouting/shortlist",
    request_body = ShortlistRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Player saved"),
        (status = 400, description = "Validation error or not an athlete"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role cannot scout"),
        (status = 404, description = "User not found")
    ),
    tag = "scouting"
)]
pub async fn add_to_shortlist(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<ShortlistRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::add_to_shortlist(db.pool(), &current.user, &req.username, req.note.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/scouting/shortlist/{username}",
    params(("username" = String, Path, description = "Saved player")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Player removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not on the shortlist")
    ),
    tag = "scouting"
)]
pub async fn remove_from_shortlist(
    State(db): State<Database>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    services::remove_from_shortlist(db.pool(), current.id(), &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
