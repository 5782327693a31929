use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::Position;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RecommendationQuery {
    pub position: Option<Position>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub country: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

impl RecommendationQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 50 {
            return Err("limit must be between 1 and 50".to_string());
        }
        if let (Some(min), Some(max)) = (self.min_age, self.max_age)
            && min > max
        {
            return Err("min_age must not exceed max_age".to_string());
        }
        Ok(())
    }
}

/// Points contributed by each signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    pub position: i32,
    pub age: i32,
    pub country: i32,
    pub popularity: i32,
    pub activity: i32,
    pub verified: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationEntry {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub position: Option<Position>,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub score: i32,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ShortlistRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShortlistEntry {
    pub player_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub position: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_age_range_is_rejected() {
        let query = RecommendationQuery {
            position: None,
            min_age: Some(25),
            max_age: Some(20),
            country: None,
            limit: 10,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn limit_bounds() {
        let mut query = RecommendationQuery {
            position: Some(Position::Defender),
            min_age: None,
            max_age: None,
            country: None,
            limit: 0,
        };
        assert!(query.validate().is_err());
        query.limit = 50;
        assert!(query.validate().is_ok());
        query.limit = 51;
        assert!(query.validate().is_err());
    }
}
