//! SQLite implementation of InteractionRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fitmatch_core::{Interaction, InteractionKind, InteractionRepository};
use rusqlite::{params, OptionalExtension};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{invalid_value, parse_datetime, parse_uuid};
use crate::Database;

pub struct SqliteInteractionRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteInteractionRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InteractionRepository for SqliteInteractionRepository {
    async fn find(&self, interacting: &Uuid, interacted: &Uuid) -> Result<Option<Interaction>> {
        let db = self.db.lock().await;
        let interaction = db
            .connection()
            .query_row(
                "SELECT id, interacting_user, interacted_user, kind, created_at
                 FROM interactions
                 WHERE interacting_user = ?1 AND interacted_user = ?2",
                params![interacting.to_string(), interacted.to_string()],
                |row| {
                    let kind: String = row.get(3)?;
                    Ok(Interaction {
                        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                        interacting_user: parse_uuid(1, &row.get::<_, String>(1)?)?,
                        interacted_user: parse_uuid(2, &row.get::<_, String>(2)?)?,
                        kind: InteractionKind::parse(&kind)
                            .ok_or_else(|| invalid_value(3, &kind))?,
                        created_at: parse_datetime(&row.get::<_, String>(4)?),
                    })
                },
            )
            .optional()?;
        Ok(interaction)
    }

    async fn create(&self, interaction: &Interaction) -> Result<bool> {
        let db = self.db.lock().await;
        let inserted = db.connection().execute(
            "INSERT INTO interactions (id, interacting_user, interacted_user, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (interacting_user, interacted_user) DO NOTHING",
            params![
                interaction.id.to_string(),
                interaction.interacting_user.to_string(),
                interaction.interacted_user.to_string(),
                interaction.kind.as_str(),
                interaction.created_at.to_rfc3339(),
            ],
        )?;
        Ok(inserted == 1)
    }
}
