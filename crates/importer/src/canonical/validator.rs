use super::models::{CanonicalFormat, FORMAT_VERSION, TournamentData};
use crate::{ImporterError, Result};
use std::collections::HashSet;
use storage::dto::validation::validate_username;
use storage::models::{Position, TournamentFormat};
use tracing::warn;

const MIN_TEAMS: usize = 2;
const MAX_TEAMS: usize = 64;

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(canonical: &CanonicalFormat) -> Result<ValidationReport> {
        let report = Self::check(canonical);

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    /// Collects every error and warning without failing.
    pub fn check(canonical: &CanonicalFormat) -> ValidationReport {
        let mut report = ValidationReport::default();

        if canonical.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                canonical.format_version, FORMAT_VERSION
            ));
        }

        if canonical.clubs.is_empty() && canonical.tournament.is_none() {
            report
                .errors
                .push("Document has neither clubs nor a tournament".to_string());
        }

        let mut usernames = HashSet::new();
        let mut emails = HashSet::new();
        let mut club_usernames = HashSet::new();

        for club in &canonical.clubs {
            check_account(
                &mut report,
                &mut usernames,
                &mut emails,
                &club.username,
                &club.email,
                &club.display_name,
            );
            club_usernames.insert(club.username.to_lowercase());

            if club.players.is_empty() {
                report
                    .warnings
                    .push(format!("Club '{}' has no players", club.username));
            }

            let mut shirt_numbers = HashSet::new();
            for player in &club.players {
                let label = format!("{} ({})", player.username, club.username);

                check_account(
                    &mut report,
                    &mut usernames,
                    &mut emails,
                    &player.username,
                    &player.email,
                    &player.display_name,
                );

                match player.position.as_deref() {
                    Some(position) if position.parse::<Position>().is_err() => {
                        report.errors.push(format!(
                            "Player '{}' has invalid position '{}'",
                            label, position
                        ));
                    }
                    Some(_) => {}
                    None => report
                        .warnings
                        .push(format!("Player '{}' has no position", label)),
                }

                if let Some(number) = player.shirt_number {
                    if !(1..=99).contains(&number) {
                        report.errors.push(format!(
                            "Player '{}' has invalid shirt number {}. Must be 1-99",
                            label, number
                        ));
                    } else if !shirt_numbers.insert(number) {
                        report.errors.push(format!(
                            "Shirt number {} is used twice in club '{}'",
                            number, club.username
                        ));
                    }
                }

                if player.date_of_birth.is_none() {
                    report
                        .warnings
                        .push(format!("Player '{}' is missing date_of_birth", label));
                }
            }
        }

        if let Some(tournament) = &canonical.tournament {
            check_tournament(&mut report, tournament, &club_usernames);
        }

        report
    }
}

fn check_account(
    report: &mut ValidationReport,
    usernames: &mut HashSet<String>,
    emails: &mut HashSet<String>,
    username: &str,
    email: &str,
    display_name: &str,
) {
    if validate_username(username).is_err() {
        report.errors.push(format!(
            "Invalid username '{}'. Use 3-30 letters, digits or underscores",
            username
        ));
    }
    if !usernames.insert(username.to_lowercase()) {
        report
            .errors
            .push(format!("Duplicate username: '{}'", username));
    }

    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        report
            .errors
            .push(format!("Account '{}' has an invalid email", username));
    } else if !emails.insert(email.to_lowercase()) {
        report.errors.push(format!("Duplicate email: '{}'", email));
    }

    if display_name.trim().is_empty() {
        report
            .errors
            .push(format!("Account '{}' has an empty display_name", username));
    }
}

fn check_tournament(
    report: &mut ValidationReport,
    tournament: &TournamentData,
    club_usernames: &HashSet<String>,
) {
    let name_len = tournament.name.chars().count();
    if !(3..=255).contains(&name_len) {
        report
            .errors
            .push("Tournament name must be between 3 and 255 characters".to_string());
    }

    if tournament.format.parse::<TournamentFormat>().is_err() {
        report.errors.push(format!(
            "Invalid tournament format '{}'. Must be 'knockout' or 'league'",
            tournament.format
        ));
    }

    if tournament.organizer_username.trim().is_empty() {
        report
            .errors
            .push("Tournament organizer_username is required".to_string());
    }

    let team_count = tournament.teams.len();
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&team_count) {
        report.errors.push(format!(
            "Tournament must list between {} and {} teams, found {}",
            MIN_TEAMS, MAX_TEAMS, team_count
        ));
    }

    let capacity = tournament.capacity();
    if !(MIN_TEAMS as i16..=MAX_TEAMS as i16).contains(&capacity) {
        report.errors.push(format!(
            "Tournament max_teams must be between {} and {}",
            MIN_TEAMS, MAX_TEAMS
        ));
    } else if (capacity as usize) < team_count {
        report.errors.push(format!(
            "Tournament lists {} teams but max_teams is {}",
            team_count, capacity
        ));
    }

    let mut names = HashSet::new();
    let mut seeds = HashSet::new();
    for team in &tournament.teams {
        if team.name.trim().is_empty() || team.name.chars().count() > 100 {
            report.errors.push(format!(
                "Team name '{}' must be between 1 and 100 characters",
                team.name
            ));
        }
        if !names.insert(team.name.to_lowercase()) {
            report
                .errors
                .push(format!("Duplicate team name: '{}'", team.name));
        }

        if let Some(seed) = team.seed {
            if !(1..=MAX_TEAMS as i16).contains(&seed) {
                report
                    .errors
                    .push(format!("Team '{}' has invalid seed {}", team.name, seed));
            } else if !seeds.insert(seed) {
                report
                    .errors
                    .push(format!("Seed {} is used twice", seed));
            }
        }

        if let Some(club) = &team.club_username {
            if !club_usernames.contains(&club.to_lowercase()) {
                report.warnings.push(format!(
                    "Team '{}' references club '{}' not in this document, it must already exist",
                    team.name, club
                ));
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> CanonicalFormat {
        serde_json::from_str(
            r#"{
                "format_version": "1.0.0",
                "source": {
                    "type": "manual",
                    "extracted_at": "2025-08-01T10:00:00Z",
                    "extractor": "league-office"
                },
                "clubs": [
                    {
                        "username": "porto_fc",
                        "email": "office@porto.example",
                        "display_name": "Porto FC",
                        "players": [
                            {
                                "username": "diogo_c",
                                "email": "diogo@porto.example",
                                "display_name": "Diogo Costa",
                                "position": "goalkeeper",
                                "shirt_number": 99,
                                "date_of_birth": "1999-09-19"
                            }
                        ]
                    },
                    {
                        "username": "braga_sc",
                        "email": "office@braga.example",
                        "display_name": "SC Braga",
                        "players": []
                    }
                ],
                "tournament": {
                    "name": "Summer Cup",
                    "format": "knockout",
                    "organizer_username": "porto_fc",
                    "teams": [
                        { "name": "Porto", "club_username": "porto_fc", "seed": 1 },
                        { "name": "Braga", "club_username": "braga_sc", "seed": 2 }
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn accepts_a_well_formed_document() {
        let report = CanonicalValidator::validate(&document()).unwrap();
        assert_eq!(report.warnings, vec!["Club 'braga_sc' has no players"]);
    }

    #[test]
    fn rejects_duplicate_accounts_across_clubs() {
        let mut doc = document();
        let mut copy = doc.clubs[0].players[0].clone();
        copy.username = "Diogo_C".to_string();
        copy.email = "other@porto.example".to_string();
        copy.shirt_number = Some(1);
        doc.clubs[1].players.push(copy);

        let report = CanonicalValidator::check(&doc);
        assert!(report.errors.iter().any(|e| e.contains("Duplicate username")));
    }

    #[test]
    fn rejects_bad_positions_and_shirt_numbers() {
        let mut doc = document();
        let player = &mut doc.clubs[0].players[0];
        player.position = Some("striker".to_string());
        player.shirt_number = Some(100);

        let report = CanonicalValidator::check(&doc);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn tournament_needs_two_distinct_teams() {
        let mut doc = document();
        let tournament = doc.tournament.as_mut().unwrap();
        tournament.teams[1].name = "porto".to_string();

        let report = CanonicalValidator::check(&doc);
        assert!(report.errors.iter().any(|e| e.contains("Duplicate team name")));

        let mut doc = document();
        doc.tournament.as_mut().unwrap().teams.truncate(1);
        assert!(CanonicalValidator::validate(&doc).is_err());
    }

    #[test]
    fn capacity_must_fit_listed_teams() {
        let mut doc = document();
        doc.tournament.as_mut().unwrap().max_teams = Some(65);
        let report = CanonicalValidator::check(&doc);
        assert!(report.errors.iter().any(|e| e.contains("max_teams")));
    }

    #[test]
    fn unknown_clubs_only_warn() {
        let mut doc = document();
        doc.tournament.as_mut().unwrap().teams[1].club_username = Some("benfica".to_string());

        let report = CanonicalValidator::validate(&doc).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("benfica")));
    }

    #[test]
    fn wrong_version_is_an_error() {
        let mut doc = document();
        doc.format_version = "2.0.0".to_string();
        assert!(CanonicalValidator::validate(&doc).is_err());
    }
}
