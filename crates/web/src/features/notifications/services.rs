use storage::{
    dto::notification::{NewNotification, NotificationFilter},
    error::Result,
    models::{Notification, NotificationKind},
    repository::notification::NotificationRepository,
};
use tracing::warn;
use uuid::Uuid;

use crate::realtime::ServerEvent;
use crate::state::AppState;

/// Stores a notification and pushes it to the recipient's open sockets.
pub async fn notify(state: &AppState, new: NewNotification) -> Result<Notification> {
    let notification = NotificationRepository::new(state.db.pool())
        .create(&new)
        .await?;

    state.hub.send(
        notification.user_id,
        ServerEvent::Notification(notification.clone()),
    );
    Ok(notification)
}

/// Side-effect notification: failures are logged, never surfaced.
pub async fn notify_quietly(
    state: &AppState,
    user_id: Uuid,
    actor_id: Option<Uuid>,
    kind: NotificationKind,
    message: String,
    entity_id: Option<Uuid>,
) {
    let new = NewNotification {
        user_id,
        actor_id,
        kind,
        message,
        entity_id,
    };

    if let Err(e) = notify(state, new).await {
        warn!(%user_id, kind = %kind, error = %e, "Failed to store notification");
    }
}

pub async fn list(
    state: &AppState,
    user_id: Uuid,
    filter: &NotificationFilter,
) -> Result<(Vec<Notification>, i64)> {
    NotificationRepository::new(state.db.pool())
        .list(user_id, filter)
        .await
}

pub async fn unread_count(state: &AppState, user_id: Uuid) -> Result<i64> {
    NotificationRepository::new(state.db.pool())
        .unread_count(user_id)
        .await
}

pub async fn mark_read(state: &AppState, notification_id: Uuid, user_id: Uuid) -> Result<()> {
    NotificationRepository::new(state.db.pool())
        .mark_read(notification_id, user_id)
        .await
}

pub async fn mark_all_read(state: &AppState, user_id: Uuid) -> Result<u64> {
    NotificationRepository::new(state.db.pool())
        .mark_all_read(user_id)
        .await
}
