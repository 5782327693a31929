use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dto::gamification::{
    BadgeResponse, CreateRewardRequest, LeaderboardEntry, RedemptionResponse, UpdateRewardRequest,
};
use crate::error::{Result, StorageError};
use crate::models::Reward;
use crate::services::gamification::{Badge, BadgeStats, PointAction};

const REWARD_COLUMNS: &str = "reward_id, name, description, cost_points, stock, active, created_at";

/// Lifetime earned points and what is left to spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointTotals {
    pub total_earned: i64,
    pub balance: i64,
}

pub struct GamificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GamificationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, user_id: Uuid, action: PointAction) -> Result<()> {
        sqlx::query("INSERT INTO point_events (user_id, action, points) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(action.as_str())
            .bind(action.points())
            .execute(self.pool)
            .await?;

        debug!(%user_id, action = action.as_str(), "Recorded points");
        Ok(())
    }

    /// Claims the first reward for `actor_id` engaging with `subject_id`.
    /// False when this engagement already paid out.
    pub async fn claim_engagement(
        &self,
        actor_id: Uuid,
        subject_id: Uuid,
        action: PointAction,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO engagement_rewards (actor_id, subject_id, action)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(actor_id)
        .bind(subject_id)
        .bind(action.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn totals(&self, user_id: Uuid) -> Result<PointTotals> {
        let (total_earned, balance) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COALESCE(SUM(points) FILTER (WHERE points > 0), 0)::BIGINT,
                   COALESCE(SUM(points), 0)::BIGINT
            FROM point_events
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(PointTotals {
            total_earned,
            balance,
        })
    }

    pub async fn badge_stats(&self, user_id: Uuid) -> Result<BadgeStats> {
        let (posts, followers, tournament_wins, total_earned) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM posts WHERE author_id = $1),
                    (SELECT COUNT(*) FROM follows WHERE followee_id = $1),
                    (SELECT COUNT(*) FROM tournaments t
                     JOIN tournament_teams tt ON tt.team_id = t.champion_team_id
                     WHERE tt.club_id = $1),
                    (SELECT COALESCE(SUM(points) FILTER (WHERE points > 0), 0)::BIGINT
                     FROM point_events WHERE user_id = $1)
                "#,
            )
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(BadgeStats {
            posts,
            followers,
            tournament_wins,
            total_earned,
        })
    }

    /// Stores the given badges and returns the ones the user did not hold yet.
    pub async fn award_badges(&self, user_id: Uuid, badges: &[Badge]) -> Result<Vec<Badge>> {
        if badges.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<&str> = badges.iter().map(|badge| badge.as_str()).collect();
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO user_badges (user_id, badge)
            SELECT $1, UNNEST($2::text[])
            ON CONFLICT (user_id, badge) DO NOTHING
            RETURNING badge
            "#,
        )
        .bind(user_id)
        .bind(&names)
        .fetch_all(self.pool)
        .await?;

        let awarded: Vec<Badge> = inserted
            .iter()
            .filter_map(|name| Badge::from_str_opt(name))
            .collect();

        if !awarded.is_empty() {
            info!(%user_id, count = awarded.len(), "Awarded badges");
        }
        Ok(awarded)
    }

    pub async fn badges(&self, user_id: Uuid) -> Result<Vec<BadgeResponse>> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT badge, awarded_at FROM user_badges WHERE user_id = $1 ORDER BY awarded_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(name, awarded_at)| match Badge::from_str_opt(&name) {
                Some(badge) => Some(BadgeResponse {
                    badge,
                    title: badge.title().to_string(),
                    description: badge.description().to_string(),
                    awarded_at,
                }),
                None => {
                    warn!(%user_id, badge = %name, "Skipping unknown badge");
                    None
                }
            })
            .collect())
    }

    /// Users ranked by lifetime earned points.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            WITH earned AS (
                SELECT user_id, SUM(points)::BIGINT AS total_earned
                FROM point_events
                WHERE points > 0
                GROUP BY user_id
            )
            SELECT RANK() OVER (ORDER BY e.total_earned DESC) AS rank,
                   u.user_id, u.username, p.display_name, e.total_earned,
                   (FLOOR(SQRT(e.total_earned / 100)) + 1)::BIGINT AS level
            FROM earned e
            JOIN users u ON u.user_id = e.user_id
            JOIN profiles p ON p.user_id = e.user_id
            WHERE u.is_active
            ORDER BY e.total_earned DESC, u.username ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn rewards(&self, include_inactive: bool) -> Result<Vec<Reward>> {
        let rewards = sqlx::query_as::<_, Reward>(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards WHERE active OR $1 ORDER BY cost_points, name"
        ))
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(rewards)
    }

    pub async fn create_reward(&self, request: &CreateRewardRequest) -> Result<Reward> {
        let reward = sqlx::query_as::<_, Reward>(&format!(
            r#"
            INSERT INTO rewards (name, description, cost_points, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING {REWARD_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.cost_points)
        .bind(request.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(reward)
    }

    pub async fn update_reward(
        &self,
        reward_id: Uuid,
        request: &UpdateRewardRequest,
    ) -> Result<Reward> {
        sqlx::query_as::<_, Reward>(&format!(
            r#"
            UPDATE rewards SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                cost_points = COALESCE($4, cost_points),
                stock = COALESCE($5, stock),
                active = COALESCE($6, active)
            WHERE reward_id = $1
            RETURNING {REWARD_COLUMNS}
            "#
        ))
        .bind(reward_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.cost_points)
        .bind(request.stock)
        .bind(request.active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Spends points on a reward. The user's row is locked so concurrent
    /// redemptions cannot overdraw the balance.
    pub async fn redeem(&self, user_id: Uuid, reward_id: Uuid) -> Result<RedemptionResponse> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT 1 FROM users WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        let reward = sqlx::query_as::<_, Reward>(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards WHERE reward_id = $1 AND active FOR UPDATE"
        ))
        .bind(reward_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        if reward.stock <= 0 {
            return Err(StorageError::InvalidState("Reward is out of stock".to_string()));
        }

        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(points), 0)::BIGINT FROM point_events WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if balance < i64::from(reward.cost_points) {
            return Err(StorageError::InvalidState(format!(
                "Insufficient points: balance {}, cost {}",
                balance, reward.cost_points
            )));
        }

        sqlx::query("UPDATE rewards SET stock = stock - 1 WHERE reward_id = $1")
            .bind(reward_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO point_events (user_id, action, points) VALUES ($1, 'redemption', $2)")
            .bind(user_id)
            .bind(-reward.cost_points)
            .execute(&mut *tx)
            .await?;

        let (redemption_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO reward_redemptions (reward_id, user_id, cost_points)
            VALUES ($1, $2, $3)
            RETURNING redemption_id, created_at
            "#,
        )
        .bind(reward_id)
        .bind(user_id)
        .bind(reward.cost_points)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(%user_id, %reward_id, "Redeemed reward");
        Ok(RedemptionResponse {
            redemption_id,
            reward_id,
            cost_points: reward.cost_points,
            remaining_balance: balance - i64::from(reward.cost_points),
            created_at,
        })
    }
}
