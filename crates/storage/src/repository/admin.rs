use sqlx::PgPool;

use crate::dto::admin::{AdminUserEntry, PlatformStats};
use crate::dto::common::PaginationParams;
use crate::error::Result;

pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<PlatformStats> {
        let stats = sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM users WHERE is_active) AS active_users,
                (SELECT COUNT(*) FROM posts) AS posts,
                (SELECT COUNT(*) FROM tournaments) AS tournaments,
                (SELECT COUNT(*) FROM orders) AS orders,
                (SELECT COALESCE(SUM(total), 0) FROM orders WHERE status = 'paid') AS paid_revenue
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn users(&self, pagination: &PaginationParams) -> Result<(Vec<AdminUserEntry>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        let users = sqlx::query_as::<_, AdminUserEntry>(
            r#"
            SELECT u.user_id, u.email, u.username, u.role, u.is_active, p.verified, u.created_at
            FROM users u
            JOIN profiles p ON p.user_id = u.user_id
            ORDER BY u.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((users, total))
    }
}
