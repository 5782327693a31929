use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        media::{CreateStreamRequest, CreateVideoRequest, StreamFilter},
    },
    error::Result,
    models::{Stream, StreamStatus, Video},
    repository::media::MediaRepository,
    services::gamification::PointAction,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::gamification::services::award_quietly;
use crate::features::users::services::find_active;
use crate::state::AppState;

pub async fn create_stream(
    pool: &PgPool,
    host_id: Uuid,
    request: &CreateStreamRequest,
) -> Result<Stream> {
    MediaRepository::new(pool).create_stream(host_id, request).await
}

pub async fn get_stream(pool: &PgPool, stream_id: Uuid) -> Result<Stream> {
    MediaRepository::new(pool).find_stream(stream_id).await
}

pub async fn list_streams(pool: &PgPool, filter: &StreamFilter) -> Result<(Vec<Stream>, i64)> {
    MediaRepository::new(pool).list_streams(filter).await
}

/// Host-only move along scheduled -> live -> ended.
pub async fn transition_stream(
    pool: &PgPool,
    stream_id: Uuid,
    user_id: Uuid,
    next: StreamStatus,
) -> WebResult<Stream> {
    let repo = MediaRepository::new(pool);
    let stream = repo.find_stream(stream_id).await?;
    if stream.host_id != user_id {
        return Err(WebError::forbidden("Only the host can control this stream"));
    }

    let expected = match next {
        StreamStatus::Live => StreamStatus::Scheduled,
        StreamStatus::Ended => StreamStatus::Live,
        StreamStatus::Scheduled => {
            return Err(WebError::bad_request("Streams cannot return to scheduled"));
        }
    };

    let stream = repo.transition_stream(stream_id, expected, next).await?;
    info!(%stream_id, status = %next, "Stream status changed");
    Ok(stream)
}

pub async fn upload_video(
    state: &AppState,
    owner_id: Uuid,
    request: &CreateVideoRequest,
) -> Result<Video> {
    let video = MediaRepository::new(state.db.pool())
        .create_video(owner_id, request)
        .await?;

    award_quietly(state, owner_id, PointAction::VideoUploaded).await;

    Ok(video)
}

/// Returns the video and counts the view.
pub async fn watch_video(pool: &PgPool, video_id: Uuid) -> Result<Video> {
    MediaRepository::new(pool).view_video(video_id).await
}

pub async fn videos_by_user(
    pool: &PgPool,
    username: &str,
    pagination: &PaginationParams,
) -> Result<(Vec<Video>, i64)> {
    let owner = find_active(pool, username).await?;
    MediaRepository::new(pool)
        .videos_by_owner(owner.user_id, pagination)
        .await
}

pub async fn delete_video(pool: &PgPool, video_id: Uuid, user_id: Uuid) -> WebResult<()> {
    let repo = MediaRepository::new(pool);
    let video = repo.find_video(video_id).await?;
    if video.owner_id != user_id {
        return Err(WebError::forbidden("Only the owner can delete this video"));
    }

    repo.delete_video(video_id).await?;
    Ok(())
}
