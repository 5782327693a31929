use sqlx::PgPool;
use storage::{
    dto::club::{
        AddMemberRequest, CallupRequest, SquadMember, StaffEntry, TransferRequest,
        TransferResponse,
    },
    error::{Result, StorageError},
    models::{
        ClubMembership, ClubStaffMember, NationalTeamCallup, NotificationKind, User, UserRole,
    },
    repository::{
        club::{ClubRepository, NewMembership, NewTransfer},
        user::UserRepository,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::notifications::services::notify_quietly;
use crate::features::users::services::find_active;
use crate::state::AppState;

/// A club is an active account with the `club` role.
async fn find_club(pool: &PgPool, username: &str) -> Result<User> {
    let club = find_active(pool, username).await?;
    if club.role != UserRole::Club.as_str() {
        return Err(StorageError::NotFound);
    }
    Ok(club)
}

async fn find_athlete(pool: &PgPool, username: &str) -> WebResult<User> {
    let player = find_active(pool, username).await?;
    if player.role != UserRole::Athlete.as_str() {
        return Err(WebError::bad_request(format!("{} is not an athlete", username)));
    }
    Ok(player)
}

pub async fn squad(pool: &PgPool, username: &str) -> Result<Vec<SquadMember>> {
    let club = find_club(pool, username).await?;
    ClubRepository::new(pool).squad(club.user_id).await
}

pub async fn staff(pool: &PgPool, username: &str) -> Result<Vec<StaffEntry>> {
    let club = find_club(pool, username).await?;
    ClubRepository::new(pool).staff(club.user_id).await
}

pub async fn add_member(
    state: &AppState,
    club: &User,
    request: &AddMemberRequest,
) -> WebResult<ClubMembership> {
    let player = find_athlete(state.db.pool(), &request.username).await?;

    let membership = ClubRepository::new(state.db.pool())
        .add_member(&NewMembership {
            club_id: club.user_id,
            player_id: player.user_id,
            shirt_number: request.shirt_number,
            position: request.position.as_deref(),
        })
        .await?;

    notify_quietly(
        state,
        player.user_id,
        Some(club.user_id),
        NotificationKind::System,
        format!("You joined the squad of {}", club.username),
        Some(club.user_id),
    )
    .await;

    Ok(membership)
}

pub async fn remove_member(pool: &PgPool, club_id: Uuid, username: &str) -> Result<()> {
    let player = UserRepository::new(pool).find_by_username(username).await?;
    ClubRepository::new(pool)
        .end_membership(club_id, player.user_id)
        .await
}

pub async fn add_staff(
    pool: &PgPool,
    club_id: Uuid,
    username: &str,
    role: &str,
) -> WebResult<ClubStaffMember> {
    let member = find_active(pool, username).await?;
    if member.user_id == club_id {
        return Err(WebError::bad_request("A club cannot be its own staff"));
    }

    let staff = ClubRepository::new(pool)
        .add_staff(club_id, member.user_id, role)
        .await?;
    Ok(staff)
}

/// Moves a player into the calling club.
pub async fn transfer(
    state: &AppState,
    club: &User,
    request: &TransferRequest,
) -> WebResult<TransferResponse> {
    let player = find_athlete(state.db.pool(), &request.username).await?;

    let transfer = ClubRepository::new(state.db.pool())
        .transfer(&NewTransfer {
            player_id: player.user_id,
            to_club_id: club.user_id,
            fee: request.fee,
            currency: request.currency.as_deref(),
            shirt_number: request.shirt_number,
        })
        .await?;

    info!(
        player = %transfer.player_username,
        to = %transfer.to_club_username,
        "Transfer completed"
    );

    notify_quietly(
        state,
        player.user_id,
        Some(club.user_id),
        NotificationKind::System,
        format!("You have been transferred to {}", club.username),
        Some(transfer.transfer_id),
    )
    .await;

    Ok(transfer)
}

pub async fn transfers_for(pool: &PgPool, username: &str) -> Result<Vec<TransferResponse>> {
    let player = find_active(pool, username).await?;
    ClubRepository::new(pool).transfers_for(player.user_id).await
}

pub async fn call_up(state: &AppState, request: &CallupRequest) -> WebResult<NationalTeamCallup> {
    let player = find_athlete(state.db.pool(), &request.username).await?;

    let callup = ClubRepository::new(state.db.pool())
        .add_callup(player.user_id, request.country.trim(), request.competition.trim())
        .await?;

    notify_quietly(
        state,
        player.user_id,
        None,
        NotificationKind::System,
        format!(
            "You have been called up by {} for {}",
            callup.country, callup.competition
        ),
        Some(callup.callup_id),
    )
    .await;

    Ok(callup)
}

pub async fn callups(pool: &PgPool, username: &str) -> Result<Vec<NationalTeamCallup>> {
    let player = find_active(pool, username).await?;
    ClubRepository::new(pool).callups(player.user_id).await
}
