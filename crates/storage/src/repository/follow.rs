use sqlx::PgPool;
use uuid::Uuid;

use super::USER_SUMMARY_COLUMNS;
use crate::dto::common::PaginationParams;
use crate::dto::user::UserSummary;
use crate::error::{Result, StorageError};

pub struct FollowRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FollowRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Returns `true` when a new edge was created, `false` if it already existed.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    pub async fn follower_count(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followee_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn followers(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<UserSummary>, i64)> {
        let total = self.follower_count(user_id).await?;

        let users = sqlx::query_as::<_, UserSummary>(&format!(
            r#"
            SELECT {USER_SUMMARY_COLUMNS}
            FROM follows f
            JOIN users u ON u.user_id = f.follower_id
            JOIN profiles p ON p.user_id = u.user_id
            WHERE f.followee_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((users, total))
    }

    pub async fn following(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<UserSummary>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        let users = sqlx::query_as::<_, UserSummary>(&format!(
            r#"
            SELECT {USER_SUMMARY_COLUMNS}
            FROM follows f
            JOIN users u ON u.user_id = f.followee_id
            JOIN profiles p ON p.user_id = u.user_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((users, total))
    }
}
