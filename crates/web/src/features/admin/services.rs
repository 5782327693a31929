use sqlx::PgPool;
use storage::{
    dto::{
        admin::{AdminUserEntry, PlatformStats},
        common::PaginationParams,
    },
    error::Result,
    repository::{
        admin::AdminRepository, post::PostRepository, session::SessionRepository,
        user::UserRepository,
    },
};
use tracing::info;
use uuid::Uuid;

pub async fn stats(pool: &PgPool) -> Result<PlatformStats> {
    AdminRepository::new(pool).stats().await
}

pub async fn users(
    pool: &PgPool,
    pagination: &PaginationParams,
) -> Result<(Vec<AdminUserEntry>, i64)> {
    AdminRepository::new(pool).users(pagination).await
}

/// Deactivates the account and signs it out everywhere.
pub async fn suspend(pool: &PgPool, username: &str) -> Result<u64> {
    let user = UserRepository::new(pool).find_by_username(username).await?;
    UserRepository::new(pool).set_active(user.user_id, false).await?;

    let revoked = SessionRepository::new(pool)
        .delete_for_user(user.user_id, None)
        .await?;

    info!(username = %user.username, revoked, "User suspended");
    Ok(revoked)
}

pub async fn unsuspend(pool: &PgPool, username: &str) -> Result<()> {
    let user = UserRepository::new(pool).find_by_username(username).await?;
    UserRepository::new(pool).set_active(user.user_id, true).await?;

    info!(username = %user.username, "User reinstated");
    Ok(())
}

pub async fn verify(pool: &PgPool, username: &str) -> Result<()> {
    let user = UserRepository::new(pool).find_by_username(username).await?;
    UserRepository::new(pool).set_verified(user.user_id, true).await
}

pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<()> {
    PostRepository::new(pool).delete(post_id).await?;

    info!(%post_id, "Post removed by moderation");
    Ok(())
}
