use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::dto::tournament::{
    CreateTournamentRequest, RecordResultRequest, RegisterTeamRequest, StandingsEntry,
    TournamentDetailResponse, TournamentFilter,
};
use crate::error::{Result, StorageError};
use crate::models::{
    Match, MatchStatus, Tournament, TournamentFormat, TournamentStatus, TournamentTeam,
};
use crate::services::bracket::{self, MatchScore, Outcome, Progress, Slot};
use crate::services::slug;

const TOURNAMENT_COLUMNS: &str = "tournament_id, name, slug, format, status, max_teams, \
     organizer_id, start_date, champion_team_id, created_at";
const TEAM_COLUMNS: &str = "team_id, tournament_id, name, club_id, seed, created_at";
const MATCH_COLUMNS: &str = "match_id, tournament_id, round, position, home_team_id, \
     away_team_id, home_score, away_score, home_penalties, away_penalties, winner_team_id, \
     status, played_at";

const MAX_SLUG_ATTEMPTS: u32 = 50;

/// What recording a result changed, for the caller to fan out side effects.
#[derive(Debug, Clone)]
pub struct RecordedResult {
    pub game: Match,
    pub winner: Option<TournamentTeam>,
    /// Set when this result finished the tournament.
    pub champion: Option<TournamentTeam>,
}

pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn generate_unique_slug(&self, name: &str) -> Result<String> {
        let base = slug::slugify(name);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug::with_counter(&base, attempt);
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM tournaments WHERE slug = $1)",
            )
            .bind(&candidate)
            .fetch_one(self.pool)
            .await?;

            if !taken {
                return Ok(candidate);
            }
        }

        Ok(format!("{}-{}", base, Uuid::new_v4().simple()))
    }

    pub async fn create(
        &self,
        organizer_id: Uuid,
        request: &CreateTournamentRequest,
    ) -> Result<Tournament> {
        let slug = self.generate_unique_slug(&request.name).await?;

        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            r#"
            INSERT INTO tournaments (name, slug, format, max_teams, organizer_id, start_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&slug)
        .bind(request.format.as_str())
        .bind(request.max_teams)
        .bind(organizer_id)
        .bind(request.start_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_conflict("Tournament slug already taken"))?;

        info!(slug = %tournament.slug, "Created tournament");
        Ok(tournament)
    }

    pub async fn list(&self, filter: &TournamentFilter) -> Result<(Vec<Tournament>, i64)> {
        let pagination = filter.pagination();
        let status = filter.status.map(|s| s.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tournaments WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments"
        ));
        if let Some(status) = status {
            query.push(" WHERE status = ").push_bind(status);
        }
        query
            .push(" ORDER BY start_date DESC NULLS LAST, created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let tournaments = query
            .build_query_as::<Tournament>()
            .fetch_all(self.pool)
            .await?;

        Ok((tournaments, total))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(&self, tournament_id: Uuid) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1"
        ))
        .bind(tournament_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Teams in seeding order: explicit seeds first, then registration order.
    pub async fn teams(&self, tournament_id: Uuid) -> Result<Vec<TournamentTeam>> {
        let teams = sqlx::query_as::<_, TournamentTeam>(&format!(
            r#"
            SELECT {TEAM_COLUMNS} FROM tournament_teams
            WHERE tournament_id = $1
            ORDER BY seed ASC NULLS LAST, created_at ASC, name ASC
            "#
        ))
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(teams)
    }

    pub async fn matches(&self, tournament_id: Uuid) -> Result<Vec<Match>> {
        let matches = sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = $1 ORDER BY round, position"
        ))
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }

    pub async fn detail(&self, slug: &str) -> Result<TournamentDetailResponse> {
        let tournament = self.find_by_slug(slug).await?;
        let teams = self.teams(tournament.tournament_id).await?;
        let matches = self.matches(tournament.tournament_id).await?;

        Ok(TournamentDetailResponse {
            tournament,
            teams,
            matches,
        })
    }

    pub async fn find_team(&self, team_id: Uuid) -> Result<TournamentTeam> {
        sqlx::query_as::<_, TournamentTeam>(&format!(
            "SELECT {TEAM_COLUMNS} FROM tournament_teams WHERE team_id = $1"
        ))
        .bind(team_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Registers a team while the tournament is open and below capacity.
    pub async fn add_team(
        &self,
        tournament_id: Uuid,
        request: &RegisterTeamRequest,
        club_id: Option<Uuid>,
    ) -> Result<TournamentTeam> {
        let mut tx = self.pool.begin().await?;
        let tournament = lock_tournament(&mut tx, tournament_id).await?;

        if tournament.status != TournamentStatus::Registration.as_str() {
            return Err(StorageError::InvalidState(
                "Tournament is not open for registration".to_string(),
            ));
        }

        let registered = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tournament_teams WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_one(&mut *tx)
        .await?;

        if registered >= i64::from(tournament.max_teams) {
            return Err(StorageError::InvalidState("Tournament is full".to_string()));
        }

        let team = sqlx::query_as::<_, TournamentTeam>(&format!(
            r#"
            INSERT INTO tournament_teams (tournament_id, name, club_id, seed)
            VALUES ($1, $2, $3, $4)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(tournament_id)
        .bind(&request.name)
        .bind(club_id)
        .bind(request.seed)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::from(e).on_conflict("A team with this name is already registered")
        })?;

        tx.commit().await?;

        Ok(team)
    }

    pub async fn set_status(
        &self,
        tournament_id: Uuid,
        status: TournamentStatus,
    ) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>(&format!(
            "UPDATE tournaments SET status = $2 WHERE tournament_id = $1 RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(tournament_id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Generates the fixture list and moves the tournament to `in_progress`.
    pub async fn start(&self, tournament_id: Uuid) -> Result<Vec<Match>> {
        let mut tx = self.pool.begin().await?;
        let tournament = lock_tournament(&mut tx, tournament_id).await?;

        if tournament.status != TournamentStatus::Registration.as_str() {
            return Err(StorageError::InvalidState(
                "Only tournaments in registration can be started".to_string(),
            ));
        }

        let teams: Vec<Uuid> = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT team_id FROM tournament_teams
            WHERE tournament_id = $1
            ORDER BY seed ASC NULLS LAST, created_at ASC, name ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&mut *tx)
        .await?;

        if teams.len() < 2 {
            return Err(StorageError::InvalidState(
                "At least two teams are required to start".to_string(),
            ));
        }

        let format: TournamentFormat = tournament
            .format
            .parse()
            .map_err(StorageError::InvalidState)?;

        let mut matches = Vec::new();
        match format {
            TournamentFormat::Knockout => {
                for planned in bracket::plan_knockout(teams.len()) {
                    let status = if planned.walkover.is_some() {
                        MatchStatus::Bye
                    } else {
                        MatchStatus::Pending
                    };
                    let game = insert_match(
                        &mut tx,
                        tournament_id,
                        planned.round,
                        planned.position,
                        planned.home.map(|i| teams[i]),
                        planned.away.map(|i| teams[i]),
                        planned.walkover.map(|i| teams[i]),
                        status,
                    )
                    .await?;
                    matches.push(game);
                }
            }
            TournamentFormat::League => {
                for (round, fixtures) in bracket::round_robin(teams.len()).into_iter().enumerate() {
                    for (position, (home, away)) in fixtures.into_iter().enumerate() {
                        let game = insert_match(
                            &mut tx,
                            tournament_id,
                            round as u16 + 1,
                            position as u16,
                            Some(teams[home]),
                            Some(teams[away]),
                            None,
                            MatchStatus::Pending,
                        )
                        .await?;
                        matches.push(game);
                    }
                }
            }
        }

        sqlx::query("UPDATE tournaments SET status = $2 WHERE tournament_id = $1")
            .bind(tournament_id)
            .bind(TournamentStatus::InProgress.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            slug = %tournament.slug,
            teams = teams.len(),
            matches = matches.len(),
            "Started tournament"
        );
        Ok(matches)
    }

    pub async fn find_match(&self, match_id: Uuid) -> Result<Match> {
        sqlx::query_as::<_, Match>(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = $1"))
            .bind(match_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Records a result, advances the knockout winner and completes the
    /// tournament when this was its last open match.
    pub async fn record_result(
        &self,
        match_id: Uuid,
        organizer_id: Uuid,
        request: &RecordResultRequest,
    ) -> Result<RecordedResult> {
        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = $1 FOR UPDATE"
        ))
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let tournament = lock_tournament(&mut tx, game.tournament_id).await?;

        if tournament.organizer_id != organizer_id {
            return Err(StorageError::Forbidden(
                "Only the organizer can record results".to_string(),
            ));
        }
        if tournament.status != TournamentStatus::InProgress.as_str() {
            return Err(StorageError::InvalidState(
                "Tournament is not in progress".to_string(),
            ));
        }
        let (home_team, away_team) = bracket::playable_teams(
            game.status == MatchStatus::Completed.as_str(),
            game.status == MatchStatus::Bye.as_str(),
            game.home_team_id,
            game.away_team_id,
        )
        .map_err(StorageError::InvalidState)?;

        let format: TournamentFormat = tournament
            .format
            .parse()
            .map_err(StorageError::InvalidState)?;
        let is_league = format == TournamentFormat::League;

        let outcome = bracket::decide_outcome(
            request.home_score,
            request.away_score,
            request.penalties(),
            is_league,
        )
        .map_err(StorageError::InvalidInput)?;

        let winner_id = match outcome {
            Outcome::HomeWin => Some(home_team),
            Outcome::AwayWin => Some(away_team),
            Outcome::Draw => None,
        };
        // Penalties only matter for knockout ties.
        let (home_penalties, away_penalties) = if !is_league && request.home_score == request.away_score {
            (request.home_penalties, request.away_penalties)
        } else {
            (None, None)
        };

        let updated = sqlx::query_as::<_, Match>(&format!(
            r#"
            UPDATE matches
            SET home_score = $2, away_score = $3, home_penalties = $4, away_penalties = $5,
                winner_team_id = $6, status = $7, played_at = NOW()
            WHERE match_id = $1
            RETURNING {MATCH_COLUMNS}
            "#
        ))
        .bind(match_id)
        .bind(request.home_score)
        .bind(request.away_score)
        .bind(home_penalties)
        .bind(away_penalties)
        .bind(winner_id)
        .bind(MatchStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let champion_id = if is_league {
            self.league_champion(&mut tx, tournament.tournament_id).await?
        } else {
            advance_winner(&mut tx, &updated, winner_id).await?
        };

        if let Some(champion_id) = champion_id {
            sqlx::query(
                "UPDATE tournaments SET status = $2, champion_team_id = $3 WHERE tournament_id = $1",
            )
            .bind(tournament.tournament_id)
            .bind(TournamentStatus::Completed.as_str())
            .bind(champion_id)
            .execute(&mut *tx)
            .await?;

            info!(slug = %tournament.slug, champion = %champion_id, "Tournament completed");
        }

        tx.commit().await?;

        let winner = match winner_id {
            Some(team_id) => Some(self.find_team(team_id).await?),
            None => None,
        };
        let champion = match champion_id {
            Some(team_id) => Some(self.find_team(team_id).await?),
            None => None,
        };

        Ok(RecordedResult {
            game: updated,
            winner,
            champion,
        })
    }

    /// Standings leader once no league match is left pending.
    async fn league_champion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: Uuid,
    ) -> Result<Option<Uuid>> {
        let pending = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM matches WHERE tournament_id = $1 AND status = 'pending'",
        )
        .bind(tournament_id)
        .fetch_one(&mut **tx)
        .await?;

        if pending > 0 {
            return Ok(None);
        }

        let teams = team_names(&mut **tx, tournament_id).await?;
        let results = completed_scores(&mut **tx, tournament_id).await?;
        let standings = bracket::compute_standings(&teams, &results);

        match bracket::league_progress(pending, &standings) {
            Progress::Champion(team_id) => Ok(Some(team_id)),
            _ => Ok(None),
        }
    }

    pub async fn standings(&self, tournament_id: Uuid) -> Result<Vec<StandingsEntry>> {
        let teams = team_names(self.pool, tournament_id).await?;
        let results = completed_scores(self.pool, tournament_id).await?;

        Ok(bracket::compute_standings(&teams, &results))
    }
}

async fn lock_tournament(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: Uuid,
) -> Result<Tournament> {
    sqlx::query_as::<_, Tournament>(&format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1 FOR UPDATE"
    ))
    .bind(tournament_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound)
}

#[allow(clippy::too_many_arguments)]
async fn insert_match(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: Uuid,
    round: u16,
    position: u16,
    home: Option<Uuid>,
    away: Option<Uuid>,
    winner: Option<Uuid>,
    status: MatchStatus,
) -> Result<Match> {
    let game = sqlx::query_as::<_, Match>(&format!(
        r#"
        INSERT INTO matches (tournament_id, round, position, home_team_id, away_team_id,
                             winner_team_id, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(tournament_id)
    .bind(round as i16)
    .bind(position as i16)
    .bind(home)
    .bind(away)
    .bind(winner)
    .bind(status.as_str())
    .fetch_one(&mut **tx)
    .await?;

    Ok(game)
}

/// Moves the winner into the next round. Returns the champion when the
/// decided match was the final.
async fn advance_winner(
    tx: &mut Transaction<'_, Postgres>,
    game: &Match,
    winner_id: Option<Uuid>,
) -> Result<Option<Uuid>> {
    let Some(winner_id) = winner_id else {
        return Err(StorageError::InvalidState(
            "Knockout matches need a winner".to_string(),
        ));
    };

    let final_round = sqlx::query_scalar::<_, i16>(
        "SELECT MAX(round) FROM matches WHERE tournament_id = $1",
    )
    .bind(game.tournament_id)
    .fetch_one(&mut **tx)
    .await?;

    let (round, position, slot) = match bracket::knockout_progress(
        game.round as u16,
        game.position as u16,
        final_round as u16,
        winner_id,
    ) {
        Progress::Advance {
            round,
            position,
            slot,
            ..
        } => (round, position, slot),
        Progress::Champion(team_id) => return Ok(Some(team_id)),
        Progress::Continue => return Ok(None),
    };
    let column = match slot {
        Slot::Home => "home_team_id",
        Slot::Away => "away_team_id",
    };

    let result = sqlx::query(&format!(
        "UPDATE matches SET {column} = $4 WHERE tournament_id = $1 AND round = $2 AND position = $3"
    ))
    .bind(game.tournament_id)
    .bind(round as i16)
    .bind(position as i16)
    .bind(winner_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::InvalidState(format!(
            "Bracket slot for round {} position {} is missing",
            round, position
        )));
    }

    debug!(%winner_id, round, position, "Advanced winner");
    Ok(None)
}

async fn team_names<'e, E>(executor: E, tournament_id: Uuid) -> Result<Vec<(Uuid, String)>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let teams = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT team_id, name FROM tournament_teams WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_all(executor)
    .await?;

    Ok(teams)
}

async fn completed_scores<'e, E>(executor: E, tournament_id: Uuid) -> Result<Vec<MatchScore>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, (Uuid, Uuid, i16, i16)>(
        r#"
        SELECT home_team_id, away_team_id, home_score, away_score
        FROM matches
        WHERE tournament_id = $1 AND status = 'completed'
          AND home_team_id IS NOT NULL AND away_team_id IS NOT NULL
          AND home_score IS NOT NULL AND away_score IS NOT NULL
        "#,
    )
    .bind(tournament_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(home, away, home_score, away_score)| MatchScore {
            home,
            away,
            home_score,
            away_score,
        })
        .collect())
}
