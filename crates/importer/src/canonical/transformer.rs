use super::models::*;
use crate::{ImporterError, Result};
use sqlx::{PgPool, Postgres, Transaction};
use storage::models::UserRole;
use storage::services::{
    password::hash_password,
    slug::{slugify, with_counter},
    token::generate_session_token,
};
use tracing::{info, warn};
use uuid::Uuid;

const MAX_SLUG_ATTEMPTS: u32 = 100;

/// What one document added to the database.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub clubs_created: usize,
    pub players_created: usize,
    pub memberships_created: usize,
    pub memberships_skipped: usize,
    pub tournament_slug: Option<String>,
    pub teams_created: usize,
}

pub struct CanonicalTransformer<'a> {
    pool: &'a PgPool,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Imports the whole document in one transaction; any failure rolls
    /// everything back.
    pub async fn import_to_database(&self, canonical: &CanonicalFormat) -> Result<ImportSummary> {
        let mut tx = self.pool.begin().await?;
        let mut summary = ImportSummary::default();

        for club in &canonical.clubs {
            let (club_id, created) = self
                .find_or_create_account(
                    &mut tx,
                    &club.username,
                    &club.email,
                    UserRole::Club,
                    &club.display_name,
                    club.country.as_deref(),
                )
                .await?;
            if created {
                summary.clubs_created += 1;
            }

            for player in &club.players {
                let (player_id, created) = self
                    .find_or_create_account(
                        &mut tx,
                        &player.username,
                        &player.email,
                        UserRole::Athlete,
                        &player.display_name,
                        player.country.as_deref(),
                    )
                    .await?;
                if created {
                    summary.players_created += 1;
                    self.fill_player_profile(&mut tx, player_id, player).await?;
                }

                if self.add_membership(&mut tx, club_id, player_id, player).await? {
                    summary.memberships_created += 1;
                } else {
                    warn!(
                        "Player '{}' already belongs to a club, membership in '{}' skipped",
                        player.username, club.username
                    );
                    summary.memberships_skipped += 1;
                }
            }
        }

        if let Some(tournament) = &canonical.tournament {
            let (slug, teams) = self.create_tournament(&mut tx, tournament).await?;
            summary.tournament_slug = Some(slug);
            summary.teams_created = teams;
        }

        tx.commit().await?;
        Ok(summary)
    }

    /// Returns the account id and whether it was created now.
    async fn find_or_create_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        username: &str,
        email: &str,
        role: UserRole,
        display_name: &str,
        country: Option<&str>,
    ) -> Result<(Uuid, bool)> {
        let existing: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT user_id, role FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some((user_id, existing_role)) = existing {
            if existing_role != role.as_str() {
                return Err(ImporterError::ImportError(format!(
                    "Account '{}' exists with role '{}', expected '{}'",
                    username, existing_role, role
                )));
            }
            return Ok((user_id, false));
        }

        // Imported accounts get an unusable random password; owners reset it.
        let password_hash = hash_password(&generate_session_token())?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id
            "#,
        )
        .bind(email.trim().to_lowercase())
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            ImporterError::TransformationError(format!(
                "Failed to create account '{}': {}",
                username, e
            ))
        })?;

        sqlx::query("INSERT INTO profiles (user_id, display_name, country) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(display_name.trim())
            .bind(country)
            .execute(&mut **tx)
            .await?;

        info!("Created {} account '{}'", role, username);
        Ok((user_id, true))
    }

    async fn fill_player_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        player_id: Uuid,
        player: &PlayerData,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET position = $2, date_of_birth = $3, nationality = $4, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(player_id)
        .bind(player.position.as_deref())
        .bind(player.date_of_birth)
        .bind(player.nationality.as_deref())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// False when the player already has an open membership anywhere.
    async fn add_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        club_id: Uuid,
        player_id: Uuid,
        player: &PlayerData,
    ) -> Result<bool> {
        let open: Option<Uuid> = sqlx::query_scalar(
            "SELECT club_id FROM club_members WHERE player_id = $1 AND left_at IS NULL",
        )
        .bind(player_id)
        .fetch_optional(&mut **tx)
        .await?;

        if open.is_some() {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO club_members (club_id, player_id, shirt_number, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(club_id)
        .bind(player_id)
        .bind(player.shirt_number)
        .bind(player.position.as_deref())
        .execute(&mut **tx)
        .await?;

        sqlx::query("UPDATE profiles SET current_club_id = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(player_id)
            .bind(club_id)
            .execute(&mut **tx)
            .await?;

        Ok(true)
    }

    async fn create_tournament(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tournament: &TournamentData,
    ) -> Result<(String, usize)> {
        let organizer_id = self
            .account_id(tx, &tournament.organizer_username)
            .await?
            .ok_or_else(|| {
                ImporterError::ImportError(format!(
                    "Organizer '{}' does not exist",
                    tournament.organizer_username
                ))
            })?;

        let slug = self.free_slug(tx, &slugify(&tournament.name)).await?;

        let tournament_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO tournaments (name, slug, format, max_teams, organizer_id, start_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING tournament_id
            "#,
        )
        .bind(tournament.name.trim())
        .bind(&slug)
        .bind(&tournament.format)
        .bind(tournament.capacity())
        .bind(organizer_id)
        .bind(tournament.start_date)
        .fetch_one(&mut **tx)
        .await?;

        for team in &tournament.teams {
            let club_id = match &team.club_username {
                Some(username) => Some(self.account_id(tx, username).await?.ok_or_else(|| {
                    ImporterError::ImportError(format!(
                        "Club '{}' for team '{}' does not exist",
                        username, team.name
                    ))
                })?),
                None => None,
            };

            sqlx::query(
                r#"
                INSERT INTO tournament_teams (tournament_id, name, club_id, seed)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(tournament_id)
            .bind(team.name.trim())
            .bind(club_id)
            .bind(team.seed)
            .execute(&mut **tx)
            .await?;
        }

        info!(
            "Created draft tournament '{}' with {} teams",
            slug,
            tournament.teams.len()
        );
        Ok((slug, tournament.teams.len()))
    }

    async fn account_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        username: &str,
    ) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar("SELECT user_id FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(id)
    }

    async fn free_slug(&self, tx: &mut Transaction<'_, Postgres>, base: &str) -> Result<String> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = with_counter(base, attempt);
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tournaments WHERE slug = $1)")
                    .bind(&candidate)
                    .fetch_one(&mut **tx)
                    .await?;
            if !taken {
                return Ok(candidate);
            }
        }

        Err(ImporterError::ImportError(format!(
            "No free slug for '{}'",
            base
        )))
    }
}
