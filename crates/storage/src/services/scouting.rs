//! Scouting recommendation heuristic: every candidate gets a score summed
//! from independent signals, then the list is sorted and sliced.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::dto::scouting::{RecommendationEntry, ScoreBreakdown};
use crate::models::Position;

pub const POSITION_MATCH_POINTS: i32 = 40;
pub const AGE_MATCH_POINTS: i32 = 20;
pub const COUNTRY_MATCH_POINTS: i32 = 10;
pub const VERIFIED_POINTS: i32 = 10;
const FOLLOWER_CAP: i64 = 1000;
const FOLLOWERS_PER_POINT: i64 = 50;
const GAMIFICATION_CAP: i64 = 2000;
const GAMIFICATION_PER_POINT: i64 = 100;

/// An athlete row as fetched for scoring.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub position: Option<Position>,
    pub date_of_birth: Option<NaiveDate>,
    pub country: Option<String>,
    pub followers: i64,
    pub points: i64,
    pub verified: bool,
}

/// What the scout is looking for. Absent fields contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub position: Option<Position>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub country: Option<String>,
}

impl Criteria {
    fn has_age_filter(&self) -> bool {
        self.min_age.is_some() || self.max_age.is_some()
    }

    fn age_matches(&self, age: u32) -> bool {
        self.min_age.is_none_or(|min| age >= min) && self.max_age.is_none_or(|max| age <= max)
    }
}

/// Whole years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

pub fn score_candidate(candidate: &Candidate, criteria: &Criteria, today: NaiveDate) -> ScoreBreakdown {
    let position = match (criteria.position, candidate.position) {
        (Some(wanted), Some(actual)) if wanted == actual => POSITION_MATCH_POINTS,
        _ => 0,
    };

    let age = match candidate.date_of_birth {
        Some(born) if criteria.has_age_filter() && criteria.age_matches(age_on(born, today)) => {
            AGE_MATCH_POINTS
        }
        _ => 0,
    };

    let country = match (&criteria.country, &candidate.country) {
        (Some(wanted), Some(actual)) if wanted.eq_ignore_ascii_case(actual) => {
            COUNTRY_MATCH_POINTS
        }
        _ => 0,
    };

    let popularity = (candidate.followers.clamp(0, FOLLOWER_CAP) / FOLLOWERS_PER_POINT) as i32;
    let activity = (candidate.points.clamp(0, GAMIFICATION_CAP) / GAMIFICATION_PER_POINT) as i32;
    let verified = if candidate.verified { VERIFIED_POINTS } else { 0 };

    ScoreBreakdown {
        position,
        age,
        country,
        popularity,
        activity,
        verified,
    }
}

/// Scores, sorts (score desc, username asc) and keeps the best `limit`.
pub fn recommend(
    candidates: Vec<Candidate>,
    criteria: &Criteria,
    today: NaiveDate,
    limit: usize,
) -> Vec<RecommendationEntry> {
    let mut entries: Vec<RecommendationEntry> = candidates
        .into_iter()
        .map(|candidate| {
            let breakdown = score_candidate(&candidate, criteria, today);
            RecommendationEntry {
                user_id: candidate.user_id,
                username: candidate.username,
                display_name: candidate.display_name,
                position: candidate.position,
                age: candidate.date_of_birth.map(|born| age_on(born, today)),
                country: candidate.country,
                score: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.username.cmp(&b.username)));
    entries.truncate(limit);
    entries
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.position + self.age + self.country + self.popularity + self.activity + self.verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn candidate(username: &str) -> Candidate {
        Candidate {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            display_name: username.to_uppercase(),
            position: None,
            date_of_birth: None,
            country: None,
            followers: 0,
            points: 0,
            verified: false,
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let born = NaiveDate::from_ymd_opt(2005, 6, 16).unwrap();
        assert_eq!(age_on(born, today()), 19);
        let born = NaiveDate::from_ymd_opt(2005, 6, 15).unwrap();
        assert_eq!(age_on(born, today()), 20);
    }

    #[test]
    fn every_signal_adds_up() {
        let mut player = candidate("winger");
        player.position = Some(Position::Forward);
        player.date_of_birth = NaiveDate::from_ymd_opt(2004, 1, 1);
        player.country = Some("Brazil".to_string());
        player.followers = 5000;
        player.points = 450;
        player.verified = true;

        let criteria = Criteria {
            position: Some(Position::Forward),
            min_age: Some(18),
            max_age: Some(23),
            country: Some("brazil".to_string()),
        };

        let breakdown = score_candidate(&player, &criteria, today());
        assert_eq!(breakdown.position, 40);
        assert_eq!(breakdown.age, 20);
        assert_eq!(breakdown.country, 10);
        assert_eq!(breakdown.popularity, 20);
        assert_eq!(breakdown.activity, 4);
        assert_eq!(breakdown.verified, 10);
        assert_eq!(breakdown.total(), 104);
    }

    #[test]
    fn no_age_filter_gives_no_age_points() {
        let mut player = candidate("keeper");
        player.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 1);

        let breakdown = score_candidate(&player, &Criteria::default(), today());
        assert_eq!(breakdown.age, 0);
    }

    #[test]
    fn open_ended_age_range() {
        let mut player = candidate("veteran");
        player.date_of_birth = NaiveDate::from_ymd_opt(1990, 1, 1);

        let criteria = Criteria {
            min_age: Some(30),
            ..Criteria::default()
        };
        assert_eq!(score_candidate(&player, &criteria, today()).age, 20);

        let criteria = Criteria {
            max_age: Some(30),
            ..Criteria::default()
        };
        assert_eq!(score_candidate(&player, &criteria, today()).age, 0);
    }

    #[test]
    fn sorted_by_score_then_username_and_sliced() {
        let mut strong = candidate("zico");
        strong.verified = true;
        let tied_a = candidate("alves");
        let tied_b = candidate("bruno");

        let ranked = recommend(
            vec![tied_b, strong, tied_a],
            &Criteria::default(),
            today(),
            2,
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].username, "zico");
        assert_eq!(ranked[0].score, 10);
        assert_eq!(ranked[1].username, "alves");
    }
}
