use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use super::USER_SUMMARY_COLUMNS;
use crate::dto::user::{ProfileResponse, UpdateProfileRequest, UserSearchFilter, UserSummary};
use crate::error::{Result, StorageError};
use crate::models::{User, UserRole};

const USER_COLUMNS: &str =
    "user_id, email, username, password_hash, role, is_active, created_at, last_login_at";

const PROFILE_RESPONSE_SELECT: &str = r#"
    SELECT u.user_id, u.username, u.role, p.display_name, p.bio, p.position,
           p.date_of_birth, p.nationality, p.country, p.height_cm, p.preferred_foot,
           p.avatar_url, p.current_club_id, p.verified, u.created_at,
           (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.user_id) AS follower_count,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.user_id) AS following_count,
           (SELECT COUNT(*) FROM posts po WHERE po.author_id = u.user_id) AS post_count
    FROM users u
    JOIN profiles p ON p.user_id = u.user_id
"#;

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub display_name: &'a str,
}

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Creates the account and its empty profile in one transaction.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, username, password_hash, role)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.email)
        .bind(new_user.username)
        .bind(new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            match err.constraint() {
                Some(c) if c.contains("email") => {
                    StorageError::ConstraintViolation("Email is already registered".to_string())
                }
                Some(c) if c.contains("username") => {
                    StorageError::ConstraintViolation("Username is already taken".to_string())
                }
                _ => err,
            }
        })?;

        sqlx::query("INSERT INTO profiles (user_id, display_name) VALUES ($1, $2)")
            .bind(user.user_id)
            .bind(new_user.display_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Case-insensitive lookup by username.
    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Login accepts either an email address or a username.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1)
            LIMIT 1
            "#
        ))
        .bind(login)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE user_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE user_id = $1")
            .bind(id)
            .bind(active)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    pub async fn set_verified(&self, id: Uuid, verified: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE profiles SET verified = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(id)
        .bind(verified)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    pub async fn summary(&self, id: Uuid) -> Result<UserSummary> {
        sqlx::query_as::<_, UserSummary>(&format!(
            r#"
            SELECT {USER_SUMMARY_COLUMNS}
            FROM users u
            JOIN profiles p ON p.user_id = u.user_id
            WHERE u.user_id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn profile(&self, id: Uuid) -> Result<ProfileResponse> {
        sqlx::query_as::<_, ProfileResponse>(&format!(
            "{PROFILE_RESPONSE_SELECT} WHERE u.user_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Public profile of an active account.
    pub async fn profile_by_username(&self, username: &str) -> Result<ProfileResponse> {
        sqlx::query_as::<_, ProfileResponse>(&format!(
            "{PROFILE_RESPONSE_SELECT} WHERE LOWER(u.username) = LOWER($1) AND u.is_active"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Applies the fields present in `req`, keeping the others.
    pub async fn update_profile(&self, id: Uuid, req: &UpdateProfileRequest) -> Result<ProfileResponse> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                position = COALESCE($4, position),
                date_of_birth = COALESCE($5, date_of_birth),
                nationality = COALESCE($6, nationality),
                country = COALESCE($7, country),
                height_cm = COALESCE($8, height_cm),
                preferred_foot = COALESCE($9, preferred_foot),
                avatar_url = COALESCE($10, avatar_url),
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .bind(&req.display_name)
        .bind(&req.bio)
        .bind(&req.position)
        .bind(req.date_of_birth)
        .bind(&req.nationality)
        .bind(&req.country)
        .bind(req.height_cm)
        .bind(&req.preferred_foot)
        .bind(&req.avatar_url)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.profile(id).await
    }

    pub async fn search(&self, filter: &UserSearchFilter) -> Result<(Vec<UserSummary>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM users u JOIN profiles p ON p.user_id = u.user_id WHERE u.is_active",
        );
        push_search_filters(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {USER_SUMMARY_COLUMNS} FROM users u JOIN profiles p ON p.user_id = u.user_id WHERE u.is_active"
        ));
        push_search_filters(&mut query, filter);
        query.push(" ORDER BY p.verified DESC, u.username LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let users = query
            .build_query_as::<UserSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok((users, total))
    }
}

fn push_search_filters(query: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &UserSearchFilter) {
    if let Some(ref q) = filter.q {
        let pattern = format!("%{}%", escape_like(q.trim()));
        query.push(" AND (u.username ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR p.display_name ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(role) = filter.role {
        query.push(" AND u.role = ");
        query.push_bind(role.as_str());
    }

    if let Some(position) = filter.position {
        query.push(" AND p.position = ");
        query.push_bind(position.as_str());
    }

    if let Some(ref country) = filter.country {
        query.push(" AND LOWER(p.country) = LOWER(");
        query.push_bind(country.clone());
        query.push(")");
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("messi"), "messi");
    }
}
