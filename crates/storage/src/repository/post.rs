use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::post::{CommentResponse, CreatePostRequest, PostResponse};
use crate::error::{Result, StorageError};
use crate::models::{Comment, Post};

/// Post columns plus author and engagement counters; `$1` is the viewer.
const POST_RESPONSE_SELECT: &str = r#"
    SELECT p.post_id, p.author_id,
           u.username AS author_username,
           pr.display_name AS author_display_name,
           pr.avatar_url AS author_avatar_url,
           p.content, p.media_url, p.visibility, p.created_at,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.post_id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.post_id) AS comment_count,
           EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.post_id AND l.user_id = $1) AS liked_by_me
    FROM posts p
    JOIN users u ON u.user_id = p.author_id
    JOIN profiles pr ON pr.user_id = p.author_id
"#;

/// True when viewer `$1` may read the post: public, own, or author followed.
const VISIBLE_TO_VIEWER: &str = r#"
    (p.visibility = 'public'
     OR p.author_id = $1
     OR EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = $1 AND f.followee_id = p.author_id))
"#;

const COMMENT_RESPONSE_SELECT: &str = r#"
    SELECT c.comment_id, c.post_id, c.author_id,
           u.username AS author_username,
           pr.display_name AS author_display_name,
           c.body, c.created_at
    FROM comments c
    JOIN users u ON u.user_id = c.author_id
    JOIN profiles pr ON pr.user_id = c.author_id
"#;

pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: Uuid, req: &CreatePostRequest) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, content, media_url, visibility)
            VALUES ($1, $2, $3, $4)
            RETURNING post_id, author_id, content, media_url, visibility, created_at
            "#,
        )
        .bind(author_id)
        .bind(&req.content)
        .bind(&req.media_url)
        .bind(&req.visibility)
        .fetch_one(self.pool)
        .await?;

        Ok(post)
    }

    pub async fn find_by_id(&self, post_id: Uuid) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT post_id, author_id, content, media_url, visibility, created_at
            FROM posts
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// A post as seen by `viewer`. Posts the viewer may not read are reported
    /// as missing.
    pub async fn view(&self, post_id: Uuid, viewer: Uuid) -> Result<PostResponse> {
        sqlx::query_as::<_, PostResponse>(&format!(
            "{POST_RESPONSE_SELECT} WHERE p.post_id = $2 AND u.is_active AND {VISIBLE_TO_VIEWER}"
        ))
        .bind(viewer)
        .bind(post_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, post_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Own posts and posts of followed accounts, newest first.
    pub async fn feed(
        &self,
        viewer: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<PostResponse>, i64)> {
        const FEED_FILTER: &str = r#"
            (p.author_id = $1
             OR p.author_id IN (SELECT followee_id FROM follows WHERE follower_id = $1))
            AND u.is_active
        "#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM posts p JOIN users u ON u.user_id = p.author_id WHERE {FEED_FILTER}"
        ))
        .bind(viewer)
        .fetch_one(self.pool)
        .await?;

        let posts = sqlx::query_as::<_, PostResponse>(&format!(
            "{POST_RESPONSE_SELECT} WHERE {FEED_FILTER} ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(viewer)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((posts, total))
    }

    pub async fn by_author(
        &self,
        author_id: Uuid,
        viewer: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<PostResponse>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM posts p WHERE p.author_id = $2 AND {VISIBLE_TO_VIEWER}"
        ))
        .bind(viewer)
        .bind(author_id)
        .fetch_one(self.pool)
        .await?;

        let posts = sqlx::query_as::<_, PostResponse>(&format!(
            r#"{POST_RESPONSE_SELECT}
            WHERE p.author_id = $2 AND {VISIBLE_TO_VIEWER}
            ORDER BY p.created_at DESC
            LIMIT $3 OFFSET $4"#
        ))
        .bind(viewer)
        .bind(author_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((posts, total))
    }

    pub async fn comments(
        &self,
        post_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<CommentResponse>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool)
            .await?;

        let comments = sqlx::query_as::<_, CommentResponse>(&format!(
            "{COMMENT_RESPONSE_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at LIMIT $2 OFFSET $3"
        ))
        .bind(post_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((comments, total))
    }

    pub async fn add_comment(&self, post_id: Uuid, author_id: Uuid, body: &str) -> Result<CommentResponse> {
        let comment_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO comments (post_id, author_id, body) VALUES ($1, $2, $3) RETURNING comment_id",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        sqlx::query_as::<_, CommentResponse>(&format!(
            "{COMMENT_RESPONSE_SELECT} WHERE c.comment_id = $1"
        ))
        .bind(comment_id)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from)
    }

    pub async fn find_comment(&self, comment_id: Uuid) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            "SELECT comment_id, post_id, author_id, body, created_at FROM comments WHERE comment_id = $1",
        )
        .bind(comment_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Returns `true` if the like is new.
    pub async fn like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT (user_id, post_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Returns `true` if a like was removed.
    pub async fn unlike(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn like_count(&self, post_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
