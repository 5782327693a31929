use chrono::Utc;
use storage::{
    dto::{
        auth::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest},
        user::CurrentUserResponse,
    },
    models::{User, UserRole},
    repository::{
        session::SessionRepository,
        user::{NewUser, UserRepository},
    },
    services::{
        password::{hash_password, verify_decoy, verify_password},
        token::{generate_session_token, hash_token},
    },
};
use tracing::info;

use crate::error::{WebError, WebResult};
use crate::middleware::session::CurrentUser;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid login or password";

/// Argon2 is CPU bound; keep it off the async workers.
async fn hash_blocking(password: String) -> WebResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| WebError::InternalServerError(e.to_string()))?
        .map_err(WebError::from)
}

async fn verify_blocking(password: String, stored_hash: String) -> WebResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| WebError::InternalServerError(e.to_string()))?
        .map_err(WebError::from)
}

/// Creates a session for `user` and returns the raw token once.
async fn issue_session(state: &AppState, user: &User) -> WebResult<AuthResponse> {
    let token = generate_session_token();
    let expires_at = Utc::now() + state.sessions.ttl();

    SessionRepository::new(state.db.pool())
        .create(user.user_id, &hash_token(&token), expires_at)
        .await?;

    let summary = UserRepository::new(state.db.pool())
        .summary(user.user_id)
        .await?;

    Ok(AuthResponse {
        token,
        expires_at,
        user: summary,
    })
}

pub async fn register(state: &AppState, request: RegisterRequest) -> WebResult<AuthResponse> {
    let role: UserRole = request.role.parse().map_err(WebError::BadRequest)?;
    if !role.is_self_assignable() {
        return Err(WebError::bad_request("This role cannot be chosen at registration"));
    }

    let password_hash = hash_blocking(request.password.clone()).await?;

    let user = UserRepository::new(state.db.pool())
        .create(&NewUser {
            email: &request.email,
            username: &request.username,
            password_hash: &password_hash,
            role,
            display_name: &request.display_name,
        })
        .await?;

    info!(username = %user.username, role = %role, "Registered user");
    issue_session(state, &user).await
}

pub async fn login(state: &AppState, request: LoginRequest) -> WebResult<AuthResponse> {
    let repo = UserRepository::new(state.db.pool());

    let Some(user) = repo.find_by_login(&request.login).await? else {
        let password = request.password;
        tokio::task::spawn_blocking(move || verify_decoy(&password))
            .await
            .map_err(|e| WebError::InternalServerError(e.to_string()))?;
        return Err(WebError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_blocking(request.password, user.password_hash.clone()).await?;
    if !valid || !user.is_active {
        return Err(WebError::unauthorized(INVALID_CREDENTIALS));
    }

    repo.touch_last_login(user.user_id).await?;
    issue_session(state, &user).await
}

pub async fn logout(state: &AppState, current: &CurrentUser) -> WebResult<()> {
    SessionRepository::new(state.db.pool())
        .delete(&current.token_hash)
        .await?;
    Ok(())
}

pub async fn me(state: &AppState, current: &CurrentUser) -> WebResult<CurrentUserResponse> {
    let profile = UserRepository::new(state.db.pool())
        .profile(current.id())
        .await?;

    Ok(CurrentUserResponse {
        email: current.user.email.clone(),
        is_active: current.user.is_active,
        last_login_at: current.user.last_login_at,
        profile,
    })
}

/// Changes the password and signs out every other session.
pub async fn change_password(
    state: &AppState,
    current: &CurrentUser,
    request: ChangePasswordRequest,
) -> WebResult<u64> {
    let valid = verify_blocking(request.current_password, current.user.password_hash.clone()).await?;
    if !valid {
        return Err(WebError::bad_request("Current password is incorrect"));
    }

    let password_hash = hash_blocking(request.new_password).await?;
    UserRepository::new(state.db.pool())
        .update_password(current.id(), &password_hash)
        .await?;

    let revoked = SessionRepository::new(state.db.pool())
        .delete_for_user(current.id(), Some(&current.token_hash))
        .await?;

    info!(user_id = %current.id(), revoked, "Password changed");
    Ok(revoked)
}

