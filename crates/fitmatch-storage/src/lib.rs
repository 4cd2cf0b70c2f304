//! FitMatch Storage Layer
//!
//! SQLite implementations of the `fitmatch-core` repository traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Domain services                      │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │      (MatchingRepository, AthleteRepository, ...)    │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │   (SqliteMatchingRepository, SqliteAthleteRepo, ...) │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │           (SQLite + numbered migrations)             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use fitmatch_storage::{Database, SqliteMatchingRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Arc::new(Mutex::new(Database::open(&path)?));
//! let matchings = SqliteMatchingRepository::new(db.clone());
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "fitmatch.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| {
        p.join(fitmatch_core::branding::APP_ID)
            .join(DATABASE_FILE)
    })
}
