//! SQLite implementation of AthleteRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fitmatch_core::{Athlete, AthleteRepository, Experience, Gender, WorkoutDay};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{invalid_value, parse_datetime, parse_uuid};
use crate::Database;

const COLUMNS: &str = "id, name, surname, email, password_hash, gender, birth_date, \
     training_experience, training_days, remaining_likes, can_see_personal_trainers, \
     is_premium, created_at, updated_at";

/// SQLite-backed implementation of AthleteRepository.
pub struct SqliteAthleteRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteAthleteRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_athlete(row: &Row<'_>) -> rusqlite::Result<Athlete> {
        let gender: String = row.get(5)?;
        let birth_date: String = row.get(6)?;
        let experience: String = row.get(7)?;
        let training_days: String = row.get(8)?;

        Ok(Athlete {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            surname: row.get(2)?,
            email: row.get(3)?,
            password_hash: row.get(4)?,
            gender: Gender::parse(&gender).ok_or_else(|| invalid_value(5, &gender))?,
            birth_date: NaiveDate::parse_from_str(&birth_date, "%Y-%m-%d")
                .map_err(|_| invalid_value(6, &birth_date))?,
            training_experience: Experience::parse(&experience)
                .ok_or_else(|| invalid_value(7, &experience))?,
            training_days: serde_json::from_str::<Vec<WorkoutDay>>(&training_days)
                .map_err(|_| invalid_value(8, &training_days))?,
            remaining_likes: row.get(9)?,
            can_see_personal_trainers: row.get::<_, i32>(10)? == 1,
            is_premium: row.get::<_, i32>(11)? == 1,
            created_at: parse_datetime(&row.get::<_, String>(12)?),
            updated_at: parse_datetime(&row.get::<_, String>(13)?),
        })
    }
}

#[async_trait]
impl AthleteRepository for SqliteAthleteRepository {
    async fn get(&self, id: &Uuid) -> Result<Option<Athlete>> {
        let db = self.db.lock().await;
        let athlete = db
            .connection()
            .query_row(
                &format!("SELECT {} FROM athletes WHERE id = ?", COLUMNS),
                params![id.to_string()],
                Self::row_to_athlete,
            )
            .optional()?;
        Ok(athlete)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Athlete>> {
        let db = self.db.lock().await;
        let athlete = db
            .connection()
            .query_row(
                &format!("SELECT {} FROM athletes WHERE email = ?", COLUMNS),
                params![email.to_lowercase()],
                Self::row_to_athlete,
            )
            .optional()?;
        Ok(athlete)
    }

    async fn create(&self, athlete: &Athlete) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            &format!(
                "INSERT INTO athletes ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                COLUMNS
            ),
            params![
                athlete.id.to_string(),
                athlete.name,
                athlete.surname,
                athlete.email,
                athlete.password_hash,
                athlete.gender.as_str(),
                athlete.birth_date.format("%Y-%m-%d").to_string(),
                athlete.training_experience.as_str(),
                serde_json::to_string(&athlete.training_days)?,
                athlete.remaining_likes,
                athlete.can_see_personal_trainers as i32,
                athlete.is_premium as i32,
                athlete.created_at.to_rfc3339(),
                athlete.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("[AthleteRepository] Created athlete {}", athlete.id);
        Ok(())
    }

    async fn update(&self, athlete: &Athlete) -> Result<()> {
        let db = self.db.lock().await;
        let updated = db.connection().execute(
            "UPDATE athletes SET name = ?2, surname = ?3, email = ?4, password_hash = ?5,
                gender = ?6, birth_date = ?7, training_experience = ?8, training_days = ?9,
                remaining_likes = ?10, can_see_personal_trainers = ?11, is_premium = ?12,
                updated_at = ?13
             WHERE id = ?1",
            params![
                athlete.id.to_string(),
                athlete.name,
                athlete.surname,
                athlete.email,
                athlete.password_hash,
                athlete.gender.as_str(),
                athlete.birth_date.format("%Y-%m-%d").to_string(),
                athlete.training_experience.as_str(),
                serde_json::to_string(&athlete.training_days)?,
                athlete.remaining_likes,
                athlete.can_see_personal_trainers as i32,
                athlete.is_premium as i32,
                athlete.updated_at.to_rfc3339(),
            ],
        )?;

        if updated == 0 {
            anyhow::bail!("Athlete not found: {}", athlete.id);
        }
        Ok(())
    }
}
