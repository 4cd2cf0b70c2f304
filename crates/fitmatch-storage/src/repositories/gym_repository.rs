//! SQLite implementation of GymRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fitmatch_core::{Gym, GymRepository};
use rusqlite::{params, OptionalExtension};
use tokio::sync::Mutex;

use super::{parse_datetime, parse_uuid};
use crate::Database;

pub struct SqliteGymRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteGymRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GymRepository for SqliteGymRepository {
    async fn find_by_name_and_city(&self, name: &str, city: &str) -> Result<Option<Gym>> {
        let db = self.db.lock().await;
        let gym = db
            .connection()
            .query_row(
                "SELECT id, name, address, city, created_by, created_at FROM gyms
                 WHERE lower(name) = lower(?1) AND lower(city) = lower(?2)",
                params![name, city],
                |row| {
                    Ok(Gym {
                        id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        city: row.get(3)?,
                        created_by: parse_uuid(4, &row.get::<_, String>(4)?)?,
                        created_at: parse_datetime(&row.get::<_, String>(5)?),
                    })
                },
            )
            .optional()?;
        Ok(gym)
    }

    async fn create(&self, gym: &Gym) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            "INSERT INTO gyms (id, name, address, city, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                gym.id.to_string(),
                gym.name,
                gym.address,
                gym.city,
                gym.created_by.to_string(),
                gym.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
