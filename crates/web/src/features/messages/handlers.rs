use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::message::{
        ConversationResponse, MarkReadResponse, MessageHistoryParams, MessageResponse,
        SendMessageRequest, StartConversationRequest,
    },
    models::Conversation,
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/conversations",
    request_body = StartConversationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Existing or new conversation", body = Conversation),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "messaging"
)]
pub async fn start_conversation(
    State(db): State<Database>,
    current: CurrentUser,
    Json(req): Json<StartConversationRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let conversation = services::start_conversation(db.pool(), current.id(), &req.username).await?;

    Ok(Json(conversation).into_response())
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Conversations, most recent first", body = Vec<ConversationResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "messaging"
)]
pub async fn list_conversations(
    State(db): State<Database>,
    current: CurrentUser,
) -> Result<Response, WebError> {
    let conversations = services::inbox(db.pool(), current.id()).await?;

    Ok(Json(conversations).into_response())
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Conversation id"),
        MessageHistoryParams
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Messages, newest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "messaging"
)]
pub async fn list_messages(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<MessageHistoryParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let messages = services::history(db.pool(), id, current.id(), &params).await?;

    Ok(Json(messages).into_response())
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    params(("id" = Uuid, Path, description = "Conversation id")),
    request_body = SendMessageRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "messaging"
)]
pub async fn send_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let message = services::send(&state, id, &current.user, &req.body).await?;

    Ok((StatusCode::CREATED, Json(message)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/read",
    params(("id" = Uuid, Path, description = "Conversation id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Messages marked as read", body = MarkReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "messaging"
)]
pub async fn mark_read(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let marked = services::mark_read(db.pool(), id, current.id()).await?;

    Ok(Json(MarkReadResponse { marked }).into_response())
}
