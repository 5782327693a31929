use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::media::{CreateStreamRequest, CreateVideoRequest, StreamFilter};
use crate::error::{Result, StorageError};
use crate::models::{Stream, StreamStatus, Video};

const STREAM_COLUMNS: &str = "stream_id, host_id, title, description, stream_url, status, \
     scheduled_for, started_at, ended_at, created_at";
const VIDEO_COLUMNS: &str =
    "video_id, owner_id, title, description, url, duration_seconds, view_count, created_at";

pub struct MediaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MediaRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_stream(&self, host_id: Uuid, request: &CreateStreamRequest) -> Result<Stream> {
        let stream = sqlx::query_as::<_, Stream>(&format!(
            r#"
            INSERT INTO streams (host_id, title, description, stream_url, scheduled_for)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STREAM_COLUMNS}
            "#
        ))
        .bind(host_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.stream_url)
        .bind(request.scheduled_for)
        .fetch_one(self.pool)
        .await?;

        Ok(stream)
    }

    pub async fn find_stream(&self, stream_id: Uuid) -> Result<Stream> {
        sqlx::query_as::<_, Stream>(&format!(
            "SELECT {STREAM_COLUMNS} FROM streams WHERE stream_id = $1"
        ))
        .bind(stream_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn list_streams(&self, filter: &StreamFilter) -> Result<(Vec<Stream>, i64)> {
        let pagination = filter.pagination();
        let status = filter.status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM streams WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        let streams = sqlx::query_as::<_, Stream>(&format!(
            r#"
            SELECT {STREAM_COLUMNS} FROM streams
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY COALESCE(started_at, scheduled_for, created_at) DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((streams, total))
    }

    /// Moves a stream one step along scheduled -> live -> ended. `expected`
    /// is the status the stream must currently be in.
    pub async fn transition_stream(
        &self,
        stream_id: Uuid,
        expected: StreamStatus,
        next: StreamStatus,
    ) -> Result<Stream> {
        let timestamp_column = match next {
            StreamStatus::Live => "started_at",
            StreamStatus::Ended => "ended_at",
            StreamStatus::Scheduled => {
                return Err(StorageError::InvalidState(
                    "Streams cannot return to scheduled".to_string(),
                ));
            }
        };

        sqlx::query_as::<_, Stream>(&format!(
            r#"
            UPDATE streams SET status = $3, {timestamp_column} = NOW()
            WHERE stream_id = $1 AND status = $2
            RETURNING {STREAM_COLUMNS}
            "#
        ))
        .bind(stream_id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidState(format!("Stream must be {} to become {}", expected, next))
        })
    }

    pub async fn create_video(&self, owner_id: Uuid, request: &CreateVideoRequest) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(&format!(
            r#"
            INSERT INTO videos (owner_id, title, description, url, duration_seconds)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.url)
        .bind(request.duration_seconds)
        .fetch_one(self.pool)
        .await?;

        Ok(video)
    }

    pub async fn find_video(&self, video_id: Uuid) -> Result<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE video_id = $1"
        ))
        .bind(video_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Counts a view and returns the updated video.
    pub async fn view_video(&self, video_id: Uuid) -> Result<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "UPDATE videos SET view_count = view_count + 1 WHERE video_id = $1 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(video_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn videos_by_owner(
        &self,
        owner_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Video>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool)
            .await?;

        let videos = sqlx::query_as::<_, Video>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS} FROM videos
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(owner_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((videos, total))
    }

    pub async fn delete_video(&self, video_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM videos WHERE video_id = $1")
            .bind(video_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
