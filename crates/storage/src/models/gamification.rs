use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reward {
    pub reward_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cost_points: i32,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RewardRedemption {
    pub redemption_id: Uuid,
    pub reward_id: Uuid,
    pub user_id: Uuid,
    pub cost_points: i32,
    pub created_at: DateTime<Utc>,
}
