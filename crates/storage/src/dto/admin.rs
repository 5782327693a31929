use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlatformStats {
    pub users: i64,
    pub active_users: i64,
    pub posts: i64,
    pub tournaments: i64,
    pub orders: i64,
    pub paid_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminUserEntry {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
