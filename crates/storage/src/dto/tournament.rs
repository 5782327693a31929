use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginationParams, default_page, default_page_size};
use crate::models::{Match, Tournament, TournamentFormat, TournamentStatus, TournamentTeam};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Name must be between 3 and 255 characters"
    ))]
    pub name: String,

    pub format: TournamentFormat,

    #[validate(range(min = 2, max = 64, message = "max_teams must be between 2 and 64"))]
    pub max_teams: i16,

    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTournamentStatusRequest {
    pub status: TournamentStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterTeamRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Team name must be between 1 and 100 characters"
    ))]
    pub name: String,

    /// Username of the club account the team represents
    #[validate(length(min = 1, max = 30))]
    pub club_username: Option<String>,

    #[validate(range(min = 1, max = 64))]
    pub seed: Option<i16>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordResultRequest {
    #[validate(range(min = 0, max = 99))]
    pub home_score: i16,

    #[validate(range(min = 0, max = 99))]
    pub away_score: i16,

    #[validate(range(min = 0, max = 99))]
    pub home_penalties: Option<i16>,

    #[validate(range(min = 0, max = 99))]
    pub away_penalties: Option<i16>,
}

impl RecordResultRequest {
    pub fn penalties(&self) -> Option<(i16, i16)> {
        match (self.home_penalties, self.away_penalties) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TournamentFilter {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub status: Option<TournamentStatus>,
}

impl TournamentFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StandingsParams {
    /// Keep only the top N rows
    pub limit: Option<u32>,
}

/// Tournament with its teams and every scheduled match.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TournamentDetailResponse {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub teams: Vec<TournamentTeam>,
    pub matches: Vec<Match>,
}

/// One row of a league table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StandingsEntry {
    pub rank: u32,
    pub team_id: Uuid,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: u32,
}
