use sqlx::PgPool;
use storage::{
    dto::message::{ConversationResponse, MessageHistoryParams, MessageResponse},
    error::Result,
    models::{Conversation, NotificationKind, User},
    repository::message::MessageRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::notifications::services::notify_quietly;
use crate::features::users::services::find_active;
use crate::realtime::ServerEvent;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 80;

/// Loads a conversation the caller takes part in.
async fn participant_conversation(
    pool: &PgPool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> WebResult<Conversation> {
    let conversation = MessageRepository::new(pool)
        .find_conversation(conversation_id)
        .await?;

    if !conversation.includes(user_id) {
        return Err(WebError::forbidden("You are not part of this conversation"));
    }
    Ok(conversation)
}

fn preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_CHARS {
        body.to_string()
    } else {
        let cut: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

pub async fn start_conversation(pool: &PgPool, user_id: Uuid, username: &str) -> WebResult<Conversation> {
    let other = find_active(pool, username).await?;
    if other.user_id == user_id {
        return Err(WebError::bad_request("You cannot message yourself"));
    }

    let conversation = MessageRepository::new(pool)
        .find_or_create_conversation(user_id, other.user_id)
        .await?;
    Ok(conversation)
}

pub async fn inbox(pool: &PgPool, user_id: Uuid) -> Result<Vec<ConversationResponse>> {
    MessageRepository::new(pool).inbox(user_id).await
}

pub async fn history(
    pool: &PgPool,
    conversation_id: Uuid,
    user_id: Uuid,
    params: &MessageHistoryParams,
) -> WebResult<Vec<MessageResponse>> {
    participant_conversation(pool, conversation_id, user_id).await?;

    let messages = MessageRepository::new(pool)
        .history(conversation_id, params)
        .await?;
    Ok(messages)
}

/// Stores the message, pushes it to both participants and notifies the
/// recipient.
pub async fn send(
    state: &AppState,
    conversation_id: Uuid,
    sender: &User,
    body: &str,
) -> WebResult<MessageResponse> {
    let conversation =
        participant_conversation(state.db.pool(), conversation_id, sender.user_id).await?;
    let recipient = conversation.other_participant(sender.user_id);

    let message = MessageResponse::from(
        MessageRepository::new(state.db.pool())
            .send(conversation_id, sender.user_id, body)
            .await?,
    );

    state
        .hub
        .send(recipient, ServerEvent::Message(message.clone()));
    state
        .hub
        .send(sender.user_id, ServerEvent::Message(message.clone()));

    notify_quietly(
        state,
        recipient,
        Some(sender.user_id),
        NotificationKind::Message,
        format!("{}: {}", sender.username, preview(body)),
        Some(conversation_id),
    )
    .await;

    Ok(message)
}

pub async fn mark_read(pool: &PgPool, conversation_id: Uuid, user_id: Uuid) -> WebResult<u64> {
    participant_conversation(pool, conversation_id, user_id).await?;

    let marked = MessageRepository::new(pool)
        .mark_read(conversation_id, user_id)
        .await?;
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previews_are_trimmed_on_char_boundaries() {
        assert_eq!(preview("short"), "short");

        let long = "é".repeat(100);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }
}
