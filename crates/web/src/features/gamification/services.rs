use sqlx::PgPool;
use storage::{
    dto::gamification::{
        CreateRewardRequest, GamificationSummary, LeaderboardEntry, RedemptionResponse,
        UpdateRewardRequest,
    },
    error::Result,
    models::{NotificationKind, Reward},
    repository::gamification::GamificationRepository,
    services::gamification::{Badge, PointAction, level_for, points_to_next_level, qualifying_badges},
};
use tracing::warn;
use uuid::Uuid;

use crate::features::notifications::services::notify_quietly;
use crate::state::AppState;

/// Records points for `action`, then awards any badge the new totals unlock.
pub async fn award(state: &AppState, user_id: Uuid, action: PointAction) -> Result<Vec<Badge>> {
    let repo = GamificationRepository::new(state.db.pool());
    repo.record(user_id, action).await?;

    let stats = repo.badge_stats(user_id).await?;
    let awarded = repo
        .award_badges(user_id, &qualifying_badges(&stats))
        .await?;

    for badge in &awarded {
        notify_quietly(
            state,
            user_id,
            None,
            NotificationKind::Achievement,
            format!("You earned the {} badge: {}", badge.title(), badge.description()),
            None,
        )
        .await;
    }

    Ok(awarded)
}

/// Side-effect award: failures are logged, never surfaced.
pub async fn award_quietly(state: &AppState, user_id: Uuid, action: PointAction) {
    if let Err(e) = award(state, user_id, action).await {
        warn!(%user_id, action = action.as_str(), error = %e, "Failed to award points");
    }
}

/// Rewards `recipient` for an engagement by `actor` on `subject`. Actions
/// that pay once per actor are skipped after the first time. Returns whether
/// this engagement is new, so callers notify only once too.
pub async fn award_engagement_quietly(
    state: &AppState,
    recipient: Uuid,
    actor: Uuid,
    subject: Uuid,
    action: PointAction,
) -> bool {
    if action.once_per_actor() {
        match GamificationRepository::new(state.db.pool())
            .claim_engagement(actor, subject, action)
            .await
        {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                warn!(
                    %actor,
                    %subject,
                    action = action.as_str(),
                    error = %e,
                    "Failed to claim engagement reward"
                );
                return false;
            }
        }
    }

    award_quietly(state, recipient, action).await;
    true
}

pub async fn summary(state: &AppState, user_id: Uuid) -> Result<GamificationSummary> {
    let repo = GamificationRepository::new(state.db.pool());
    let totals = repo.totals(user_id).await?;
    let badges = repo.badges(user_id).await?;

    Ok(GamificationSummary {
        user_id,
        total_earned: totals.total_earned,
        balance: totals.balance,
        level: level_for(totals.total_earned),
        points_to_next_level: points_to_next_level(totals.total_earned),
        badges,
    })
}

pub async fn leaderboard(state: &AppState, limit: u32) -> Result<Vec<LeaderboardEntry>> {
    GamificationRepository::new(state.db.pool())
        .leaderboard(limit)
        .await
}

pub async fn active_rewards(state: &AppState) -> Result<Vec<Reward>> {
    GamificationRepository::new(state.db.pool())
        .rewards(false)
        .await
}

pub async fn redeem(state: &AppState, user_id: Uuid, reward_id: Uuid) -> Result<RedemptionResponse> {
    GamificationRepository::new(state.db.pool())
        .redeem(user_id, reward_id)
        .await
}

pub async fn all_rewards(pool: &PgPool) -> Result<Vec<Reward>> {
    GamificationRepository::new(pool).rewards(true).await
}

pub async fn create_reward(pool: &PgPool, request: &CreateRewardRequest) -> Result<Reward> {
    GamificationRepository::new(pool).create_reward(request).await
}

pub async fn update_reward(
    pool: &PgPool,
    reward_id: Uuid,
    request: &UpdateRewardRequest,
) -> Result<Reward> {
    GamificationRepository::new(pool)
        .update_reward(reward_id, request)
        .await
}
