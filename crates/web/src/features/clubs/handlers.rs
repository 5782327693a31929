use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::club::{
        AddMemberRequest, AddStaffRequest, CallupRequest, SquadMember, StaffEntry,
        TransferRequest, TransferResponse,
    },
    models::{ClubMembership, ClubStaffMember, NationalTeamCallup, UserRole},
};
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/clubs/{username}/squad",
    params(("username" = String, Path, description = "Club username")),
    responses(
        (status = 200, description = "Current players", body = Vec<SquadMember>),
        (status = 404, description = "Club not found")
    ),
    tag = "clubs"
)]
pub async fn squad(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let squad = services::squad(db.pool(), &username).await?;

    Ok(Json(squad).into_response())
}

#[utoipa::path(
    get,
    path = "/api/clubs/{username}/staff",
    params(("username" = String, Path, description = "Club username")),
    responses(
        (status = 200, description = "Technical staff", body = Vec<StaffEntry>),
        (status = 404, description = "Club not found")
    ),
    tag = "clubs"
)]
pub async fn staff(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let staff = services::staff(db.pool(), &username).await?;

    Ok(Json(staff).into_response())
}

#[utoipa::path(
    post,
    path = "/api/clubs/me/members",
    request_body = AddMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Player added to the squad", body = ClubMembership),
        (status = 400, description = "Validation error or not an athlete"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club account"),
        (status = 404, description = "Player not found"),
        (status = 409, description = "Player already belongs to a club")
    ),
    tag = "clubs"
)]
pub async fn add_member(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<AddMemberRequest>,
) -> Result<Response, WebError> {
    current.require_role(UserRole::Club)?;
    req.validate()?;

    let membership = services::add_member(&state, &current.user, &req).await?;

    Ok((StatusCode::CREATED, Json(membership)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/clubs/me/members/{username}",
    params(("username" = String, Path, description = "Player username")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Membership closed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club account"),
        (status = 404, description = "Player is not in the squad")
    ),
    tag = "clubs"
)]
pub async fn remove_member(
    State(db): State<Database>,
    current: CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    current.require_role(UserRole::Club)?;

    services::remove_member(db.pool(), current.id(), &username).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/clubs/me/staff",
    request_body = AddStaffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Staff member added", body = ClubStaffMember),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club account"),
        (status = 404, description = "User not found")
    ),
    tag = "clubs"
)]
pub async fn add_staff(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<AddStaffRequest>,
) -> Result<Response, WebError> {
    current.require_role(UserRole::Club)?;
    req.validate()?;

    let member = services::add_staff(db.pool(), current.id(), &req.username, &req.role).await?;

    Ok((StatusCode::CREATED, Json(member)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/transfers",
    request_body = TransferRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Player moved to the calling club", body = TransferResponse),
        (status = 400, description = "Validation error or not an athlete"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a club account"),
        (status = 404, description = "Player not found"),
        (status = 409, description = "Player already plays for this club")
    ),
    tag = "clubs"
)]
pub async fn transfer(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<TransferRequest>,
) -> Result<Response, WebError> {
    current.require_role(UserRole::Club)?;
    req.validate()?;
    req.validate_fee().map_err(WebError::BadRequest)?;

    let transfer = services::transfer(&state, &current.user, &req).await?;

    Ok((StatusCode::CREATED, Json(transfer)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/transfers",
    params(("username" = String, Path, description = "Player username")),
    responses(
        (status = 200, description = "Transfer history, newest first", body = Vec<TransferResponse>),
        (status = 404, description = "User not found")
    ),
    tag = "clubs"
)]
pub async fn user_transfers(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let transfers = services::transfers_for(db.pool(), &username).await?;

    Ok(Json(transfers).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/national-team",
    params(("username" = String, Path, description = "Player username")),
    responses(
        (status = 200, description = "National team call-ups, newest first", body = Vec<NationalTeamCallup>),
        (status = 404, description = "User not found")
    ),
    tag = "clubs"
)]
pub async fn user_callups(
    State(db): State<Database>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let callups = services::callups(db.pool(), &username).await?;

    Ok(Json(callups).into_response())
}

#[utoipa::path(
    post,
    path = "/api/national-teams/callups",
    request_body = CallupRequest,
    security(("api_key" = [])),
    responses(
        (status = 201, description = "Call-up recorded", body = NationalTeamCallup),
        (status = 400, description = "Validation error or not an athlete"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Player not found")
    ),
    tag = "admin"
)]
pub async fn call_up(
    State(state): State<AppState>,
    Json(req): Json<CallupRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let callup = services::call_up(&state, &req).await?;

    Ok((StatusCode::CREATED, Json(callup)).into_response())
}
