use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use storage::{
    Database,
    models::{User, UserRole},
    repository::session::SessionRepository,
    services::token::hash_token,
};
use uuid::Uuid;

use super::auth::bearer_token;
use crate::error::WebError;

/// The account behind the request's session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token_hash: String,
}

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.user.user_id
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.role.parse().ok()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role() == Some(role)
    }

    pub fn require_role(&self, role: UserRole) -> Result<(), WebError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(WebError::forbidden(format!("Only {} accounts can do this", role)))
        }
    }
}

/// Resolves a raw session token to its active account.
pub async fn resolve_session(db: &Database, token: &str) -> Result<CurrentUser, WebError> {
    let token_hash = hash_token(token);
    let user = SessionRepository::new(db.pool())
        .find_user(&token_hash)
        .await?
        .ok_or_else(|| WebError::unauthorized("Invalid or expired session"))?;

    Ok(CurrentUser { user, token_hash })
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| WebError::unauthorized("Missing session token"))?;
        let db = Database::from_ref(state);

        resolve_session(&db, token).await
    }
}
