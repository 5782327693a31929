use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::services::gamification::Badge;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BadgeResponse {
    pub badge: Badge,
    pub title: String,
    pub description: String,
    pub awarded_at: DateTime<Utc>,
}

/// Points, level and badges of one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GamificationSummary {
    pub user_id: Uuid,
    pub total_earned: i64,
    pub balance: i64,
    pub level: i64,
    pub points_to_next_level: i64,
    pub badges: Vec<BadgeResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub total_earned: i64,
    pub level: i64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LeaderboardParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

impl LeaderboardParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRewardRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "cost_points must be positive"))]
    pub cost_points: i32,

    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRewardRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub cost_points: Option<i32>,

    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RedemptionResponse {
    pub redemption_id: Uuid,
    pub reward_id: Uuid,
    pub cost_points: i32,
    pub remaining_balance: i64,
    pub created_at: DateTime<Utc>,
}
