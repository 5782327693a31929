use sqlx::PgPool;
use storage::{
    dto::tournament::{
        CreateTournamentRequest, RecordResultRequest, RegisterTeamRequest, StandingsEntry,
        TournamentDetailResponse, TournamentFilter,
    },
    error::Result,
    models::{
        Match, NotificationKind, Tournament, TournamentStatus, TournamentTeam, User, UserRole,
    },
    repository::tournament::TournamentRepository,
    services::gamification::PointAction,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::gamification::services::award_quietly;
use crate::features::notifications::services::notify_quietly;
use crate::features::users::services::find_active;
use crate::state::AppState;

async fn organized_by(pool: &PgPool, slug: &str, user_id: Uuid) -> WebResult<Tournament> {
    let tournament = TournamentRepository::new(pool).find_by_slug(slug).await?;
    if tournament.organizer_id != user_id {
        return Err(WebError::forbidden("Only the organizer can do this"));
    }
    Ok(tournament)
}

pub async fn create(
    pool: &PgPool,
    organizer_id: Uuid,
    request: &CreateTournamentRequest,
) -> Result<Tournament> {
    let tournament = TournamentRepository::new(pool)
        .create(organizer_id, request)
        .await?;
    info!(slug = %tournament.slug, format = %tournament.format, "Tournament created");
    Ok(tournament)
}

pub async fn list(pool: &PgPool, filter: &TournamentFilter) -> Result<(Vec<Tournament>, i64)> {
    TournamentRepository::new(pool).list(filter).await
}

pub async fn detail(pool: &PgPool, slug: &str) -> Result<TournamentDetailResponse> {
    TournamentRepository::new(pool).detail(slug).await
}

/// Direct status changes; starting and completing go through their own
/// operations.
pub async fn update_status(
    pool: &PgPool,
    slug: &str,
    user_id: Uuid,
    next: TournamentStatus,
) -> WebResult<Tournament> {
    let tournament = organized_by(pool, slug, user_id).await?;

    let current: TournamentStatus = tournament
        .status
        .parse()
        .map_err(WebError::InternalServerError)?;
    current.ensure_can_move_to(next)?;

    let updated = TournamentRepository::new(pool)
        .set_status(tournament.tournament_id, next)
        .await?;
    Ok(updated)
}

/// The organizer may register any team. A club account may register a team
/// for itself only.
pub async fn register_team(
    pool: &PgPool,
    slug: &str,
    caller: &User,
    request: &RegisterTeamRequest,
) -> WebResult<TournamentTeam> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_slug(slug).await?;
    let is_organizer = tournament.organizer_id == caller.user_id;
    let is_club = caller.role == UserRole::Club.as_str();

    let club_id = match request.club_username.as_deref() {
        Some(username) => {
            let club = find_active(pool, username).await?;
            if club.role != UserRole::Club.as_str() {
                return Err(WebError::bad_request(format!("{} is not a club", username)));
            }
            if !is_organizer && club.user_id != caller.user_id {
                return Err(WebError::forbidden("Clubs can only register their own team"));
            }
            Some(club.user_id)
        }
        None if is_organizer => None,
        None if is_club => Some(caller.user_id),
        None => {
            return Err(WebError::forbidden(
                "Only the organizer or a club can register teams",
            ));
        }
    };

    let team = repo
        .add_team(tournament.tournament_id, request, club_id)
        .await?;
    Ok(team)
}

pub async fn start(state: &AppState, slug: &str, user_id: Uuid) -> WebResult<Vec<Match>> {
    let pool = state.db.pool();
    let tournament = organized_by(pool, slug, user_id).await?;
    let repo = TournamentRepository::new(pool);

    let fixtures = repo.start(tournament.tournament_id).await?;
    info!(slug = %tournament.slug, matches = fixtures.len(), "Tournament started");

    for team in repo.teams(tournament.tournament_id).await? {
        if let Some(club_id) = team.club_id {
            notify_quietly(
                state,
                club_id,
                Some(user_id),
                NotificationKind::Tournament,
                format!("{} has started. Check your fixtures", tournament.name),
                Some(tournament.tournament_id),
            )
            .await;
        }
    }

    Ok(fixtures)
}

/// Records a result and awards the winning and champion clubs.
pub async fn record_result(
    state: &AppState,
    match_id: Uuid,
    user_id: Uuid,
    request: &RecordResultRequest,
) -> WebResult<Match> {
    let recorded = TournamentRepository::new(state.db.pool())
        .record_result(match_id, user_id, request)
        .await?;

    if let Some(club_id) = recorded.winner.as_ref().and_then(|team| team.club_id) {
        award_quietly(state, club_id, PointAction::MatchWon).await;
    }

    if let Some(champion) = &recorded.champion {
        info!(
            tournament_id = %recorded.game.tournament_id,
            team = %champion.name,
            "Tournament completed"
        );
        if let Some(club_id) = champion.club_id {
            award_quietly(state, club_id, PointAction::TournamentWin).await;
            notify_quietly(
                state,
                club_id,
                None,
                NotificationKind::Tournament,
                format!("{} won the tournament", champion.name),
                Some(recorded.game.tournament_id),
            )
            .await;
        }
    }

    Ok(recorded.game)
}

pub async fn standings(pool: &PgPool, slug: &str, limit: Option<u32>) -> Result<Vec<StandingsEntry>> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_slug(slug).await?;

    let mut table = repo.standings(tournament.tournament_id).await?;
    if let Some(limit) = limit {
        table.truncate(limit as usize);
    }
    Ok(table)
}
