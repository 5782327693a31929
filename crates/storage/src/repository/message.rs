use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::message::{ConversationResponse, MessageHistoryParams, MessageResponse};
use crate::dto::user::UserSummary;
use crate::error::{Result, StorageError};
use crate::models::conversation::ordered_pair;
use crate::models::{Conversation, Message};

const CONVERSATION_COLUMNS: &str = "conversation_id, user_a, user_b, created_at, last_message_at";

#[derive(FromRow)]
struct InboxRow {
    conversation_id: Uuid,
    created_at: DateTime<Utc>,
    last_message_at: Option<DateTime<Utc>>,
    user_id: Uuid,
    username: String,
    display_name: String,
    role: String,
    avatar_url: Option<String>,
    verified: bool,
    last_message_id: Option<Uuid>,
    last_sender_id: Option<Uuid>,
    last_body: Option<String>,
    last_created_at: Option<DateTime<Utc>>,
    last_read_at: Option<DateTime<Utc>>,
    unread_count: i64,
}

impl From<InboxRow> for ConversationResponse {
    fn from(row: InboxRow) -> Self {
        let last_message = match (row.last_message_id, row.last_sender_id, row.last_body, row.last_created_at) {
            (Some(message_id), Some(sender_id), Some(body), Some(created_at)) => Some(MessageResponse {
                message_id,
                conversation_id: row.conversation_id,
                sender_id,
                body,
                created_at,
                read_at: row.last_read_at,
            }),
            _ => None,
        };

        Self {
            conversation_id: row.conversation_id,
            other_user: UserSummary {
                user_id: row.user_id,
                username: row.username,
                display_name: row.display_name,
                role: row.role,
                avatar_url: row.avatar_url,
                verified: row.verified,
            },
            last_message,
            last_message_at: row.last_message_at,
            unread_count: row.unread_count,
            created_at: row.created_at,
        }
    }
}

pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Returns the existing conversation between two users or creates it.
    pub async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> Result<Conversation> {
        let (user_a, user_b) = ordered_pair(a, b);

        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            r#"
            INSERT INTO conversations (user_a, user_b)
            VALUES ($1, $2)
            ON CONFLICT (user_a, user_b) DO UPDATE SET user_a = EXCLUDED.user_a
            RETURNING {CONVERSATION_COLUMNS}
            "#
        ))
        .bind(user_a)
        .bind(user_b)
        .fetch_one(self.pool)
        .await?;

        Ok(conversation)
    }

    pub async fn find_conversation(&self, conversation_id: Uuid) -> Result<Conversation> {
        sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE conversation_id = $1"
        ))
        .bind(conversation_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Inbox of `user_id`, most recently active first.
    pub async fn inbox(&self, user_id: Uuid) -> Result<Vec<ConversationResponse>> {
        let rows = sqlx::query_as::<_, InboxRow>(
            r#"
            SELECT c.conversation_id, c.created_at, c.last_message_at,
                   u.user_id, u.username, p.display_name, u.role, p.avatar_url, p.verified,
                   lm.message_id AS last_message_id,
                   lm.sender_id AS last_sender_id,
                   lm.body AS last_body,
                   lm.created_at AS last_created_at,
                   lm.read_at AS last_read_at,
                   (SELECT COUNT(*) FROM messages m
                    WHERE m.conversation_id = c.conversation_id
                      AND m.sender_id <> $1 AND m.read_at IS NULL) AS unread_count
            FROM conversations c
            JOIN users u ON u.user_id = CASE WHEN c.user_a = $1 THEN c.user_b ELSE c.user_a END
            JOIN profiles p ON p.user_id = u.user_id
            LEFT JOIN LATERAL (
                SELECT message_id, sender_id, body, created_at, read_at
                FROM messages
                WHERE conversation_id = c.conversation_id
                ORDER BY created_at DESC
                LIMIT 1
            ) lm ON TRUE
            WHERE c.user_a = $1 OR c.user_b = $1
            ORDER BY COALESCE(c.last_message_at, c.created_at) DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ConversationResponse::from).collect())
    }

    /// Page of messages, newest first.
    pub async fn history(
        &self,
        conversation_id: Uuid,
        params: &MessageHistoryParams,
    ) -> Result<Vec<MessageResponse>> {
        let messages = sqlx::query_as::<_, MessageResponse>(
            r#"
            SELECT message_id, conversation_id, sender_id, body, created_at, read_at
            FROM messages
            WHERE conversation_id = $1 AND ($2::timestamptz IS NULL OR created_at < $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(conversation_id)
        .bind(params.before)
        .bind(i64::from(params.limit))
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn send(&self, conversation_id: Uuid, sender_id: Uuid, body: &str) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, body)
            VALUES ($1, $2, $3)
            RETURNING message_id, conversation_id, sender_id, body, created_at, read_at
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE conversation_id = $1")
            .bind(conversation_id)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// Marks every message from the other participant as read.
    pub async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET read_at = NOW()
            WHERE conversation_id = $1 AND sender_id <> $2 AND read_at IS NULL
            "#,
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
