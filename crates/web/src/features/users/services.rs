use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        user::{ProfileResponse, UpdateProfileRequest, UserSearchFilter, UserSummary},
    },
    error::{Result, StorageError},
    models::{NotificationKind, User},
    repository::{follow::FollowRepository, user::UserRepository},
    services::gamification::PointAction,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::gamification::services::award_engagement_quietly;
use crate::features::notifications::services::notify_quietly;
use crate::state::AppState;

/// Looks up an active account by username; suspended accounts count as missing.
pub async fn find_active(pool: &PgPool, username: &str) -> Result<User> {
    let user = UserRepository::new(pool).find_by_username(username).await?;
    if !user.is_active {
        return Err(StorageError::NotFound);
    }
    Ok(user)
}

pub async fn profile(pool: &PgPool, username: &str) -> Result<ProfileResponse> {
    UserRepository::new(pool).profile_by_username(username).await
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    request: &UpdateProfileRequest,
) -> Result<ProfileResponse> {
    UserRepository::new(pool).update_profile(user_id, request).await
}

pub async fn search(pool: &PgPool, filter: &UserSearchFilter) -> Result<(Vec<UserSummary>, i64)> {
    UserRepository::new(pool).search(filter).await
}

pub async fn follow(state: &AppState, follower: &User, username: &str) -> WebResult<()> {
    let followee = find_active(state.db.pool(), username).await?;
    if followee.user_id == follower.user_id {
        return Err(WebError::bad_request("You cannot follow yourself"));
    }

    let created = FollowRepository::new(state.db.pool())
        .follow(follower.user_id, followee.user_id)
        .await?;

    if created
        && award_engagement_quietly(
            state,
            followee.user_id,
            follower.user_id,
            followee.user_id,
            PointAction::FollowerGained,
        )
        .await
    {
        notify_quietly(
            state,
            followee.user_id,
            Some(follower.user_id),
            NotificationKind::Follow,
            format!("{} started following you", follower.username),
            Some(follower.user_id),
        )
        .await;
    }

    Ok(())
}

pub async fn unfollow(pool: &PgPool, follower_id: Uuid, username: &str) -> Result<()> {
    let followee = UserRepository::new(pool).find_by_username(username).await?;
    FollowRepository::new(pool)
        .unfollow(follower_id, followee.user_id)
        .await
}

pub async fn followers(
    pool: &PgPool,
    username: &str,
    pagination: &PaginationParams,
) -> Result<(Vec<UserSummary>, i64)> {
    let user = find_active(pool, username).await?;
    FollowRepository::new(pool)
        .followers(user.user_id, pagination)
        .await
}

pub async fn following(
    pool: &PgPool,
    username: &str,
    pagination: &PaginationParams,
) -> Result<(Vec<UserSummary>, i64)> {
    let user = find_active(pool, username).await?;
    FollowRepository::new(pool)
        .following(user.user_id, pagination)
        .await
}
