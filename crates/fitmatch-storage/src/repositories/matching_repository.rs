//! SQLite implementation of MatchingRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fitmatch_core::{Matching, MatchingRepository, MatchingStatus};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{invalid_value, parse_datetime, parse_uuid};
use crate::Database;

const COLUMNS: &str = "id, interacted_user, interacting_user, status, created_at, updated_at";

/// SQLite-backed implementation of MatchingRepository.
pub struct SqliteMatchingRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteMatchingRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_matching(row: &Row<'_>) -> rusqlite::Result<Matching> {
        let status: String = row.get(3)?;
        Ok(Matching {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            interacted_user: parse_uuid(1, &row.get::<_, String>(1)?)?,
            interacting_user: parse_uuid(2, &row.get::<_, String>(2)?)?,
            status: MatchingStatus::parse(&status).ok_or_else(|| invalid_value(3, &status))?,
            created_at: parse_datetime(&row.get::<_, String>(4)?),
            updated_at: parse_datetime(&row.get::<_, String>(5)?),
        })
    }
}

#[async_trait]
impl MatchingRepository for SqliteMatchingRepository {
    async fn get(&self, id: &Uuid) -> Result<Option<Matching>> {
        let db = self.db.lock().await;
        let matching = db
            .connection()
            .query_row(
                &format!("SELECT {} FROM matchings WHERE id = ?", COLUMNS),
                params![id.to_string()],
                Self::row_to_matching,
            )
            .optional()?;
        Ok(matching)
    }

    async fn find_active_between(&self, first: &Uuid, second: &Uuid) -> Result<Option<Matching>> {
        let db = self.db.lock().await;
        let matching = db
            .connection()
            .query_row(
                &format!(
                    "SELECT {} FROM matchings
                     WHERE status = 'ACTIVE'
                       AND ((interacted_user = ?1 AND interacting_user = ?2)
                         OR (interacted_user = ?2 AND interacting_user = ?1))
                     ORDER BY created_at ASC
                     LIMIT 1",
                    COLUMNS
                ),
                params![first.to_string(), second.to_string()],
                Self::row_to_matching,
            )
            .optional()?;
        Ok(matching)
    }

    async fn find_by_id_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<Matching>> {
        let db = self.db.lock().await;
        let matching = db
            .connection()
            .query_row(
                &format!(
                    "SELECT {} FROM matchings
                     WHERE id = ?1 AND (interacted_user = ?2 OR interacting_user = ?2)",
                    COLUMNS
                ),
                params![id.to_string(), user_id.to_string()],
                Self::row_to_matching,
            )
            .optional()?;
        Ok(matching)
    }

    async fn create(&self, matching: &Matching) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            &format!(
                "INSERT INTO matchings ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                COLUMNS
            ),
            params![
                matching.id.to_string(),
                matching.interacted_user.to_string(),
                matching.interacting_user.to_string(),
                matching.status.as_str(),
                matching.created_at.to_rfc3339(),
                matching.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("[MatchingRepository] Created matching {}", matching.id);
        Ok(())
    }

    async fn update(&self, matching: &Matching) -> Result<()> {
        let db = self.db.lock().await;
        let updated = db.connection().execute(
            "UPDATE matchings SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                matching.id.to_string(),
                matching.status.as_str(),
                matching.updated_at.to_rfc3339(),
            ],
        )?;

        if updated == 0 {
            anyhow::bail!("Matching not found: {}", matching.id);
        }
        Ok(())
    }
}
