use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub user_id: Uuid,
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
    pub updated_at: DateTime<Utc>,
}
