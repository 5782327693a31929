use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::gamification::{
        CreateRewardRequest, GamificationSummary, LeaderboardEntry, LeaderboardParams,
        RedemptionResponse, UpdateRewardRequest,
    },
    models::Reward,
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::features::users::services::find_active;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/gamification/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Points, level and badges of the caller", body = GamificationSummary),
        (status = 401, description = "Unauthorized")
    ),
    tag = "gamification"
)]
pub async fn my_summary(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, WebError> {
    let summary = services::summary(&state, current.id()).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/achievements",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Points, level and badges of the user", body = GamificationSummary),
        (status = 404, description = "User not found")
    ),
    tag = "gamification"
)]
pub async fn user_achievements(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let user = find_active(state.db.pool(), &username).await?;
    let summary = services::summary(&state, user.user_id).await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    get,
    path = "/api/gamification/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Top users by earned points", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid limit")
    ),
    tag = "gamification"
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let entries = services::leaderboard(&state, params.limit).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rewards",
    responses(
        (status = 200, description = "Active rewards", body = Vec<Reward>)
    ),
    tag = "gamification"
)]
pub async fn list_rewards(State(state): State<AppState>) -> Result<Response, WebError> {
    let rewards = services::active_rewards(&state).await?;

    Ok(Json(rewards).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rewards/{id}/redeem",
    params(("id" = Uuid, Path, description = "Reward id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Reward redeemed", body = RedemptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reward not found"),
        (status = 409, description = "Insufficient points or out of stock")
    ),
    tag = "gamification"
)]
pub async fn redeem_reward(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let redemption = services::redeem(&state, current.id(), id).await?;

    Ok((StatusCode::CREATED, Json(redemption)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/rewards",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Every reward, inactive included", body = Vec<Reward>),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn admin_list_rewards(State(db): State<Database>) -> Result<Response, WebError> {
    let rewards = services::all_rewards(db.pool()).await?;

    Ok(Json(rewards).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/rewards",
    request_body = CreateRewardRequest,
    security(("api_key" = [])),
    responses(
        (status = 201, description = "Reward created", body = Reward),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid admin key")
    ),
    tag = "admin"
)]
pub async fn create_reward(
    State(db): State<Database>,
    Json(req): Json<CreateRewardRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let reward = services::create_reward(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(reward)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/rewards/{id}",
    params(("id" = Uuid, Path, description = "Reward id")),
    request_body = UpdateRewardRequest,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Reward updated", body = Reward),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid admin key"),
        (status = 404, description = "Reward not found")
    ),
    tag = "admin"
)]
pub async fn update_reward(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRewardRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let reward = services::update_reward(db.pool(), id, &req).await?;

    Ok(Json(reward).into_response())
}
