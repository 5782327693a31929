use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        tournament::{
            CreateTournamentRequest, RecordResultRequest, RegisterTeamRequest, StandingsEntry,
            StandingsParams, TournamentDetailResponse, TournamentFilter,
            UpdateTournamentStatusRequest,
        },
    },
    models::{Match, Tournament, TournamentTeam},
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Tournament created in draft", body = Tournament),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tournament = services::create(db.pool(), current.id(), &req).await?;

    Ok((StatusCode::CREATED, Json(tournament)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments",
    params(TournamentFilter),
    responses(
        (status = 200, description = "Paginated tournaments", body = PaginatedResponse<Tournament>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
    Query(filter): Query<TournamentFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let (tournaments, total) = services::list(db.pool(), &filter).await?;

    Ok(Json(PaginatedResponse::from_params(tournaments, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{slug}",
    params(("slug" = String, Path, description = "Tournament slug")),
    responses(
        (status = 200, description = "Tournament with teams and matches", body = TournamentDetailResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let detail = services::detail(db.pool(), &slug).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/{slug}/status",
    params(("slug" = String, Path, description = "Tournament slug")),
    request_body = UpdateTournamentStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = Tournament),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "tournaments"
)]
pub async fn update_status(
    State(db): State<Database>,
    current: CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<UpdateTournamentStatusRequest>,
) -> Result<Response, WebError> {
    let tournament = services::update_status(db.pool(), &slug, current.id(), req.status).await?;

    Ok(Json(tournament).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{slug}/teams",
    params(("slug" = String, Path, description = "Tournament slug")),
    request_body = RegisterTeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Team registered", body = TournamentTeam),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to register this team"),
        (status = 404, description = "Tournament or club not found"),
        (status = 409, description = "Registration closed, tournament full or name taken")
    ),
    tag = "tournaments"
)]
pub async fn register_team(
    State(db): State<Database>,
    current: CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<RegisterTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = services::register_team(db.pool(), &slug, &current.user, &req).await?;

    Ok((StatusCode::CREATED, Json(team)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{slug}/start",
    params(("slug" = String, Path, description = "Tournament slug")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Generated fixtures", body = Vec<Match>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Not in registration or too few teams")
    ),
    tag = "tournaments"
)]
pub async fn start_tournament(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let fixtures = services::start(&state, &slug, current.id()).await?;

    Ok(Json(fixtures).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{slug}/standings",
    params(
        ("slug" = String, Path, description = "Tournament slug"),
        StandingsParams
    ),
    responses(
        (status = 200, description = "League table", body = Vec<StandingsEntry>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn standings(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Query(params): Query<StandingsParams>,
) -> Result<Response, WebError> {
    let table = services::standings(db.pool(), &slug, params.limit).await?;

    Ok(Json(table).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches/{id}/result",
    params(("id" = Uuid, Path, description = "Match id")),
    request_body = RecordResultRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Result recorded", body = Match),
        (status = 400, description = "Invalid score or missing penalties"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Match already decided or not playable")
    ),
    tag = "tournaments"
)]
pub async fn record_result(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let game = services::record_result(&state, id, current.id(), &req).await?;

    Ok(Json(game).into_response())
}
