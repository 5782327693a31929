use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        post::{CommentResponse, CreatePostRequest, LikeResponse, PostResponse},
    },
    error::Result,
    models::{NotificationKind, User},
    repository::post::PostRepository,
    services::gamification::PointAction,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::gamification::services::{award_engagement_quietly, award_quietly};
use crate::features::notifications::services::notify_quietly;
use crate::features::users::services::find_active;
use crate::state::AppState;

/// Viewer id used for anonymous reads; it matches no author or follower.
pub const ANONYMOUS: Uuid = Uuid::nil();

pub async fn create_post(
    state: &AppState,
    author: &User,
    request: &CreatePostRequest,
) -> Result<PostResponse> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo.create(author.user_id, request).await?;

    award_quietly(state, author.user_id, PointAction::PostCreated).await;

    repo.view(post.post_id, author.user_id).await
}

pub async fn get_post(pool: &PgPool, post_id: Uuid, viewer: Uuid) -> Result<PostResponse> {
    PostRepository::new(pool).view(post_id, viewer).await
}

pub async fn delete_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> WebResult<()> {
    let repo = PostRepository::new(pool);
    let post = repo.find_by_id(post_id).await?;
    if post.author_id != user_id {
        return Err(WebError::forbidden("Only the author can delete this post"));
    }

    repo.delete(post_id).await?;
    Ok(())
}

pub async fn feed(
    pool: &PgPool,
    viewer: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<PostResponse>, i64)> {
    PostRepository::new(pool).feed(viewer, pagination).await
}

pub async fn posts_by_user(
    pool: &PgPool,
    username: &str,
    viewer: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<PostResponse>, i64)> {
    let author = find_active(pool, username).await?;
    PostRepository::new(pool)
        .by_author(author.user_id, viewer, pagination)
        .await
}

pub async fn comments(
    pool: &PgPool,
    post_id: Uuid,
    viewer: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<CommentResponse>, i64)> {
    let repo = PostRepository::new(pool);
    repo.view(post_id, viewer).await?;
    repo.comments(post_id, pagination).await
}

pub async fn add_comment(
    state: &AppState,
    post_id: Uuid,
    author: &User,
    body: &str,
) -> Result<CommentResponse> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo.view(post_id, author.user_id).await?;
    let comment = repo.add_comment(post_id, author.user_id, body).await?;

    award_quietly(state, author.user_id, PointAction::CommentCreated).await;
    if post.author_id != author.user_id {
        notify_quietly(
            state,
            post.author_id,
            Some(author.user_id),
            NotificationKind::Comment,
            format!("{} commented on your post", author.username),
            Some(post_id),
        )
        .await;
    }

    Ok(comment)
}

/// Comment authors and the post's author may delete a comment.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid, user_id: Uuid) -> WebResult<()> {
    let repo = PostRepository::new(pool);
    let comment = repo.find_comment(comment_id).await?;

    if comment.author_id != user_id {
        let post = repo.find_by_id(comment.post_id).await?;
        if post.author_id != user_id {
            return Err(WebError::forbidden(
                "Only the comment or post author can delete this comment",
            ));
        }
    }

    repo.delete_comment(comment_id).await?;
    Ok(())
}

pub async fn like(state: &AppState, post_id: Uuid, user: &User) -> Result<LikeResponse> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo.view(post_id, user.user_id).await?;
    let created = repo.like(user.user_id, post_id).await?;

    if created
        && post.author_id != user.user_id
        && award_engagement_quietly(
            state,
            post.author_id,
            user.user_id,
            post_id,
            PointAction::LikeReceived,
        )
        .await
    {
        notify_quietly(
            state,
            post.author_id,
            Some(user.user_id),
            NotificationKind::Like,
            format!("{} liked your post", user.username),
            Some(post_id),
        )
        .await;
    }

    Ok(LikeResponse {
        post_id,
        like_count: repo.like_count(post_id).await?,
        liked_by_me: true,
    })
}

pub async fn unlike(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<LikeResponse> {
    let repo = PostRepository::new(pool);
    repo.unlike(user_id, post_id).await?;

    Ok(LikeResponse {
        post_id,
        like_count: repo.like_count(post_id).await?,
        liked_by_me: false,
    })
}
