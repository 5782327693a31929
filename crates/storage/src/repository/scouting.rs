use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::dto::scouting::ShortlistEntry;
use crate::error::{Result, StorageError};
use crate::models::Position;
use crate::services::scouting::Candidate;

#[derive(FromRow)]
struct CandidateRow {
    user_id: Uuid,
    username: String,
    display_name: String,
    position: Option<String>,
    date_of_birth: Option<NaiveDate>,
    country: Option<String>,
    followers: i64,
    points: i64,
    verified: bool,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        let position = row.position.as_deref().and_then(|value| {
            value
                .parse::<Position>()
                .map_err(|e| warn!(username = %row.username, "{}", e))
                .ok()
        });

        Candidate {
            user_id: row.user_id,
            username: row.username,
            display_name: row.display_name,
            position,
            date_of_birth: row.date_of_birth,
            country: row.country,
            followers: row.followers,
            points: row.points,
            verified: row.verified,
        }
    }
}

pub struct ScoutingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoutingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every active athlete except `exclude`, with the counters the
    /// recommendation score needs.
    pub async fn candidates(&self, exclude: Uuid) -> Result<Vec<Candidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT u.user_id, u.username, p.display_name, p.position, p.date_of_birth,
                   p.country, p.verified,
                   (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.user_id) AS followers,
                   COALESCE((SELECT SUM(pe.points) FILTER (WHERE pe.points > 0)
                             FROM point_events pe WHERE pe.user_id = u.user_id), 0)::BIGINT AS points
            FROM users u
            JOIN profiles p ON p.user_id = u.user_id
            WHERE u.role = 'athlete' AND u.is_active AND u.user_id <> $1
            "#,
        )
        .bind(exclude)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    /// Saves a player, replacing the note when already shortlisted.
    pub async fn add_to_shortlist(
        &self,
        scout_id: Uuid,
        player_id: Uuid,
        note: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scout_shortlist (scout_id, player_id, note)
            VALUES ($1, $2, $3)
            ON CONFLICT (scout_id, player_id) DO UPDATE SET note = EXCLUDED.note
            "#,
        )
        .bind(scout_id)
        .bind(player_id)
        .bind(note)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn shortlist(&self, scout_id: Uuid) -> Result<Vec<ShortlistEntry>> {
        let entries = sqlx::query_as::<_, ShortlistEntry>(
            r#"
            SELECT s.player_id, u.username, p.display_name, p.position, s.note, s.created_at
            FROM scout_shortlist s
            JOIN users u ON u.user_id = s.player_id
            JOIN profiles p ON p.user_id = s.player_id
            WHERE s.scout_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(scout_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn remove_from_shortlist(&self, scout_id: Uuid, player_id: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM scout_shortlist WHERE scout_id = $1 AND player_id = $2")
                .bind(scout_id)
                .bind(player_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
