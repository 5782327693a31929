use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::scouting::{RecommendationEntry, RecommendationQuery, ShortlistEntry},
    error::Result,
    models::{User, UserRole},
    repository::{scouting::ScoutingRepository, user::UserRepository},
    services::scouting::{Criteria, recommend},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::users::services::find_active;

fn ensure_scout(user: &User) -> WebResult<()> {
    let allowed = user
        .role
        .parse::<UserRole>()
        .is_ok_and(|role| role.can_scout());
    if allowed {
        Ok(())
    } else {
        Err(WebError::forbidden(
            "Only scouts, coaches and clubs can use scouting",
        ))
    }
}

fn criteria_from(query: &RecommendationQuery) -> Criteria {
    Criteria {
        position: query.position,
        min_age: query.min_age,
        max_age: query.max_age,
        country: query
            .country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty())
            .map(str::to_string),
    }
}

pub async fn recommendations(
    pool: &PgPool,
    scout: &User,
    query: &RecommendationQuery,
) -> WebResult<Vec<RecommendationEntry>> {
    ensure_scout(scout)?;

    let candidates = ScoutingRepository::new(pool)
        .candidates(scout.user_id)
        .await?;
    let today = Utc::now().date_naive();

    Ok(recommend(
        candidates,
        &criteria_from(query),
        today,
        query.limit as usize,
    ))
}

pub async fn add_to_shortlist(
    pool: &PgPool,
    scout: &User,
    username: &str,
    note: Option<&str>,
) -> WebResult<()> {
    ensure_scout(scout)?;

    let player = find_active(pool, username).await?;
    if player.role != UserRole::Athlete.as_str() {
        return Err(WebError::bad_request(format!("{} is not an athlete", username)));
    }

    ScoutingRepository::new(pool)
        .add_to_shortlist(scout.user_id, player.user_id, note)
        .await?;
    Ok(())
}

pub async fn shortlist(pool: &PgPool, scout: &User) -> WebResult<Vec<ShortlistEntry>> {
    ensure_scout(scout)?;

    let entries = ScoutingRepository::new(pool).shortlist(scout.user_id).await?;
    Ok(entries)
}

pub async fn remove_from_shortlist(pool: &PgPool, scout_id: Uuid, username: &str) -> Result<()> {
    let player = UserRepository::new(pool).find_by_username(username).await?;
    ScoutingRepository::new(pool)
        .remove_from_shortlist(scout_id, player.user_id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::Position;

    #[test]
    fn blank_country_is_no_filter() {
        let query = RecommendationQuery {
            position: Some(Position::Midfielder),
            min_age: None,
            max_age: Some(21),
            country: Some("  ".to_string()),
            limit: 10,
        };

        let criteria = criteria_from(&query);
        assert_eq!(criteria.position, Some(Position::Midfielder));
        assert_eq!(criteria.max_age, Some(21));
        assert!(criteria.country.is_none());
    }
}
