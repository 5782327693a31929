use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClubMembership {
    pub membership_id: Uuid,
    pub club_id: Uuid,
    pub player_id: Uuid,
    pub shirt_number: Option<i16>,
    pub position: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClubStaffMember {
    pub club_id: Uuid,
    pub staff_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transfer {
    pub transfer_id: Uuid,
    pub player_id: Uuid,
    pub from_club_id: Option<Uuid>,
    pub to_club_id: Uuid,
    pub fee: Option<Decimal>,
    pub currency: Option<String>,
    pub transferred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NationalTeamCallup {
    pub callup_id: Uuid,
    pub player_id: Uuid,
    pub country: String,
    pub competition: String,
    pub called_up_at: DateTime<Utc>,
}
