use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub slug: String,
    pub format: String,
    pub status: String,
    pub max_teams: i16,
    pub organizer_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub champion_team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TournamentTeam {
    pub team_id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub club_id: Option<Uuid>,
    pub seed: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Match {
    pub match_id: Uuid,
    pub tournament_id: Uuid,
    pub round: i16,
    pub position: i16,
    pub home_team_id: Option<Uuid>,
    pub away_team_id: Option<Uuid>,
    pub home_score: Option<i16>,
    pub away_score: Option<i16>,
    pub home_penalties: Option<i16>,
    pub away_penalties: Option<i16>,
    pub winner_team_id: Option<Uuid>,
    pub status: String,
    pub played_at: Option<DateTime<Utc>>,
}
