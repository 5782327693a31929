use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        post::{CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse, PostResponse},
    },
};
use uuid::Uuid;
use validator::Validate;

use super::services::{self, ANONYMOUS};
use crate::error::WebError;
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

fn viewer_id(current: &Option<CurrentUser>) -> Uuid {
    current.as_ref().map(CurrentUser::id).unwrap_or(ANONYMOUS)
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Post published", body = PostResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let post = services::create_post(&state, &current.user, &req).await?;

    Ok((StatusCode::CREATED, Json(post)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found or not visible")
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(db): State<Database>,
    current: Option<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let post = services::get_post(db.pool(), id, viewer_id(&current)).await?;

    Ok(Json(post).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_post(db.pool(), id, current.id()).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/feed",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own posts and posts of followed users, newest first", body = PaginatedResponse<PostResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "posts"
)]
pub async fn feed(
    State(db): State<Database>,
    current: CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (posts, total) = services::feed(db.pool(), current.id(), &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(posts, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/posts",
    params(
        ("username" = String, Path, description = "Author username"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Posts by the user visible to the caller", body = PaginatedResponse<PostResponse>),
        (status = 404, description = "User not found")
    ),
    tag = "posts"
)]
pub async fn user_posts(
    State(db): State<Database>,
    current: Option<CurrentUser>,
    Path(username): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (posts, total) =
        services::posts_by_user(db.pool(), &username, viewer_id(&current), &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(posts, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Post id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = PaginatedResponse<CommentResponse>),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn list_comments(
    State(db): State<Database>,
    current: Option<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (comments, total) =
        services::comments(db.pool(), id, viewer_id(&current), &pagination).await?;

    Ok(Json(PaginatedResponse::from_params(comments, &pagination, total)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let comment = services::add_comment(&state, id, &current.user, &req.body).await?;

    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the comment or post author"),
        (status = 404, description = "Comment not found")
    ),
    tag = "posts"
)]
pub async fn delete_comment(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_comment(db.pool(), id, current.id()).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post liked", body = LikeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn like_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let like = services::like(&state, id, &current.user).await?;

    Ok(Json(like).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Like removed", body = LikeResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "posts"
)]
pub async fn unlike_post(
    State(db): State<Database>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let like = services::unlike(db.pool(), id, current.id()).await?;

    Ok(Json(like).into_response())
}
