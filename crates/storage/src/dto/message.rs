use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StartConversationRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(
        min = 1,
        max = 4000,
        message = "Message must be between 1 and 4000 characters"
    ))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MessageResponse {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<crate::models::Message> for MessageResponse {
    fn from(message: crate::models::Message) -> Self {
        Self {
            message_id: message.message_id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            body: message.body,
            created_at: message.created_at,
            read_at: message.read_at,
        }
    }
}

/// Inbox entry as seen by one participant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub conversation_id: Uuid,
    pub other_user: UserSummary,
    pub last_message: Option<MessageResponse>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct MessageHistoryParams {
    /// Only messages created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

impl MessageHistoryParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 200 {
            return Err("limit must be between 1 and 200".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MarkReadResponse {
    pub marked: u64,
}
