//! SQLite repository implementations.

mod athlete_repository;
mod chat_message_repository;
mod gym_repository;
mod interaction_repository;
mod matching_repository;
mod subscription_repository;

pub use athlete_repository::SqliteAthleteRepository;
pub use chat_message_repository::SqliteChatMessageRepository;
pub use gym_repository::SqliteGymRepository;
pub use interaction_repository::SqliteInteractionRepository;
pub use matching_repository::SqliteMatchingRepository;
pub use subscription_repository::{SqlitePremiumPackageRepository, SqliteSubscriptionRepository};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

/// Parse a datetime string to DateTime<Utc>.
/// Handles both RFC3339 format and SQLite's `datetime('now')` format.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.and_utc();
    }

    tracing::warn!("[Storage] Unparseable timestamp '{}', using now", s);
    Utc::now()
}

/// Parse a UUID column, surfacing malformed ids as conversion errors.
pub(crate) fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<Uuid> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Conversion error for a text column holding an unknown enum value.
pub(crate) fn invalid_value(column: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("unexpected value '{}'", value).into(),
    )
}
