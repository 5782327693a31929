use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginationParams, default_page, default_page_size};
use super::validation::{validate_position, validate_preferred_foot};
use crate::models::{Position, UserRole};

/// Compact user reference embedded in other responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub verified: bool,
}

/// Public profile with social counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country: Option<String>,
    pub height_cm: Option<i16>,
    pub preferred_foot: Option<String>,
    pub avatar_url: Option<String>,
    pub current_club_id: Option<Uuid>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
}

/// The signed-in account, including private fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub email: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub profile: ProfileResponse,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(custom(function = "validate_position"))]
    pub position: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub nationality: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,

    #[validate(range(min = 100, max = 250, message = "Height must be between 100 and 250 cm"))]
    pub height_cm: Option<i16>,

    #[validate(custom(function = "validate_preferred_foot"))]
    pub preferred_foot: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserSearchFilter {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Case-insensitive match on username or display name
    pub q: Option<String>,
    pub role: Option<UserRole>,
    pub position: Option<Position>,
    pub country: Option<String>,
}

impl UserSearchFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()?;

        if let Some(ref q) = self.q
            && q.len() > 100
        {
            return Err("q must be at most 100 characters".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_checks_enums_and_ranges() {
        let update = UpdateProfileRequest {
            position: Some("striker".to_string()),
            height_cm: Some(90),
            preferred_foot: Some("left".to_string()),
            ..UpdateProfileRequest::default()
        };

        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("position"));
        assert!(fields.contains_key("height_cm"));
        assert!(!fields.contains_key("preferred_foot"));
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
