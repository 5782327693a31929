use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::dto::club::{SquadMember, StaffEntry, TransferResponse};
use crate::error::{Result, StorageError};
use crate::models::{ClubMembership, ClubStaffMember, NationalTeamCallup};

const MEMBERSHIP_COLUMNS: &str =
    "membership_id, club_id, player_id, shirt_number, position, joined_at, left_at";
const OPEN_MEMBERSHIP_INDEX: &str = "club_members_open_idx";

/// A player joining a club.
#[derive(Debug, Clone)]
pub struct NewMembership<'a> {
    pub club_id: Uuid,
    pub player_id: Uuid,
    pub shirt_number: Option<i16>,
    pub position: Option<&'a str>,
}

/// A completed move between clubs.
#[derive(Debug, Clone)]
pub struct NewTransfer<'a> {
    pub player_id: Uuid,
    pub to_club_id: Uuid,
    pub fee: Option<Decimal>,
    pub currency: Option<&'a str>,
    pub shirt_number: Option<i16>,
}

pub struct ClubRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClubRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn squad(&self, club_id: Uuid) -> Result<Vec<SquadMember>> {
        let squad = sqlx::query_as::<_, SquadMember>(
            r#"
            SELECT m.player_id, u.username, p.display_name, m.shirt_number,
                   COALESCE(m.position, p.position) AS position, m.joined_at
            FROM club_members m
            JOIN users u ON u.user_id = m.player_id
            JOIN profiles p ON p.user_id = m.player_id
            WHERE m.club_id = $1 AND m.left_at IS NULL
            ORDER BY m.shirt_number ASC NULLS LAST, u.username ASC
            "#,
        )
        .bind(club_id)
        .fetch_all(self.pool)
        .await?;

        Ok(squad)
    }

    pub async fn staff(&self, club_id: Uuid) -> Result<Vec<StaffEntry>> {
        let staff = sqlx::query_as::<_, StaffEntry>(
            r#"
            SELECT s.staff_id, u.username, p.display_name, s.role, s.joined_at
            FROM club_staff s
            JOIN users u ON u.user_id = s.staff_id
            JOIN profiles p ON p.user_id = s.staff_id
            WHERE s.club_id = $1
            ORDER BY s.role, u.username
            "#,
        )
        .bind(club_id)
        .fetch_all(self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn add_member(&self, membership: &NewMembership<'_>) -> Result<ClubMembership> {
        let mut tx = self.pool.begin().await?;
        let created = open_membership(&mut tx, membership).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Ends the player's membership at `club_id`.
    pub async fn end_membership(&self, club_id: Uuid, player_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE club_members SET left_at = NOW()
            WHERE club_id = $1 AND player_id = $2 AND left_at IS NULL
            "#,
        )
        .bind(club_id)
        .bind(player_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            "UPDATE profiles SET current_club_id = NULL, updated_at = NOW() WHERE user_id = $1 AND current_club_id = $2",
        )
        .bind(player_id)
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Adds or re-roles a staff member.
    pub async fn add_staff(&self, club_id: Uuid, staff_id: Uuid, role: &str) -> Result<ClubStaffMember> {
        let member = sqlx::query_as::<_, ClubStaffMember>(
            r#"
            INSERT INTO club_staff (club_id, staff_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (club_id, staff_id) DO UPDATE SET role = EXCLUDED.role
            RETURNING club_id, staff_id, role, joined_at
            "#,
        )
        .bind(club_id)
        .bind(staff_id)
        .bind(role)
        .fetch_one(self.pool)
        .await?;

        Ok(member)
    }

    /// Closes the player's open membership, opens one at the buying club and
    /// records the move, all in one transaction.
    pub async fn transfer(&self, transfer: &NewTransfer<'_>) -> Result<TransferResponse> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent transfers of the same player.
        sqlx::query("SELECT 1 FROM users WHERE user_id = $1 FOR UPDATE")
            .bind(transfer.player_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        let current = sqlx::query_as::<_, ClubMembership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM club_members WHERE player_id = $1 AND left_at IS NULL"
        ))
        .bind(transfer.player_id)
        .fetch_optional(&mut *tx)
        .await?;

        let from_club_id = current.as_ref().map(|m| m.club_id);
        if from_club_id == Some(transfer.to_club_id) {
            return Err(StorageError::ConstraintViolation(
                "Player already belongs to this club".to_string(),
            ));
        }

        if let Some(current) = &current {
            sqlx::query("UPDATE club_members SET left_at = NOW() WHERE membership_id = $1")
                .bind(current.membership_id)
                .execute(&mut *tx)
                .await?;
        }

        let position = current.as_ref().and_then(|m| m.position.clone());
        open_membership(
            &mut tx,
            &NewMembership {
                club_id: transfer.to_club_id,
                player_id: transfer.player_id,
                shirt_number: transfer.shirt_number,
                position: position.as_deref(),
            },
        )
        .await?;

        let transfer_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO transfers (player_id, from_club_id, to_club_id, fee, currency)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING transfer_id
            "#,
        )
        .bind(transfer.player_id)
        .bind(from_club_id)
        .bind(transfer.to_club_id)
        .bind(transfer.fee)
        .bind(transfer.currency.map(str::to_uppercase))
        .fetch_one(&mut *tx)
        .await?;

        let response = fetch_transfer(&mut tx, transfer_id).await?;
        tx.commit().await?;

        info!(
            player_id = %transfer.player_id,
            to_club_id = %transfer.to_club_id,
            "Recorded transfer"
        );
        Ok(response)
    }

    pub async fn transfers_for(&self, player_id: Uuid) -> Result<Vec<TransferResponse>> {
        let transfers = sqlx::query_as::<_, TransferResponse>(&format!(
            "{TRANSFER_SELECT} WHERE t.player_id = $1 ORDER BY t.transferred_at DESC"
        ))
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(transfers)
    }

    pub async fn add_callup(
        &self,
        player_id: Uuid,
        country: &str,
        competition: &str,
    ) -> Result<NationalTeamCallup> {
        let callup = sqlx::query_as::<_, NationalTeamCallup>(
            r#"
            INSERT INTO national_team_callups (player_id, country, competition)
            VALUES ($1, $2, $3)
            RETURNING callup_id, player_id, country, competition, called_up_at
            "#,
        )
        .bind(player_id)
        .bind(country)
        .bind(competition)
        .fetch_one(self.pool)
        .await?;

        Ok(callup)
    }

    pub async fn callups(&self, player_id: Uuid) -> Result<Vec<NationalTeamCallup>> {
        let callups = sqlx::query_as::<_, NationalTeamCallup>(
            r#"
            SELECT callup_id, player_id, country, competition, called_up_at
            FROM national_team_callups
            WHERE player_id = $1
            ORDER BY called_up_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(callups)
    }
}

const TRANSFER_SELECT: &str = r#"
    SELECT t.transfer_id, t.player_id, pu.username AS player_username,
           t.from_club_id, fu.username AS from_club_username,
           t.to_club_id, tu.username AS to_club_username,
           t.fee, t.currency, t.transferred_at
    FROM transfers t
    JOIN users pu ON pu.user_id = t.player_id
    LEFT JOIN users fu ON fu.user_id = t.from_club_id
    JOIN users tu ON tu.user_id = t.to_club_id
"#;

async fn open_membership(
    conn: &mut PgConnection,
    membership: &NewMembership<'_>,
) -> Result<ClubMembership> {
    let created = sqlx::query_as::<_, ClubMembership>(&format!(
        r#"
        INSERT INTO club_members (club_id, player_id, shirt_number, position)
        VALUES ($1, $2, $3, $4)
        RETURNING {MEMBERSHIP_COLUMNS}
        "#
    ))
    .bind(membership.club_id)
    .bind(membership.player_id)
    .bind(membership.shirt_number)
    .bind(membership.position)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        let err = StorageError::from(e);
        if err.constraint() == Some(OPEN_MEMBERSHIP_INDEX) {
            StorageError::ConstraintViolation("Player already belongs to a club".to_string())
        } else {
            err
        }
    })?;

    sqlx::query("UPDATE profiles SET current_club_id = $2, updated_at = NOW() WHERE user_id = $1")
        .bind(membership.player_id)
        .bind(membership.club_id)
        .execute(&mut *conn)
        .await?;

    Ok(created)
}

async fn fetch_transfer(conn: &mut PgConnection, transfer_id: Uuid) -> Result<TransferResponse> {
    let transfer = sqlx::query_as::<_, TransferResponse>(&format!(
        "{TRANSFER_SELECT} WHERE t.transfer_id = $1"
    ))
    .bind(transfer_id)
    .fetch_one(conn)
    .await?;

    Ok(transfer)
}
