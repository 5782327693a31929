//! Canonical JSON document describing clubs, their squads and an optional
//! tournament to seed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalFormat {
    pub format_version: String,
    pub source: SourceMetadata,
    #[serde(default)]
    pub clubs: Vec<ClubData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub extractor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Manual,
    Csv,
    Spreadsheet,
    Federation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubData {
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shirt_number: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentData {
    pub name: String,
    pub format: String,
    /// Defaults to the number of listed teams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_teams: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    pub organizer_username: String,
    #[serde(default)]
    pub teams: Vec<TeamData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i16>,
}

impl TournamentData {
    pub fn capacity(&self) -> i16 {
        self.max_teams
            .unwrap_or_else(|| i16::try_from(self.teams.len()).unwrap_or(i16::MAX))
    }
}
