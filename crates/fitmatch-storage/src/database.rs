//! Database manager for SQLite storage.
//!
//! ## Migration System
//!
//! Migrations are numbered sequentially (001, 002, ...) and stored in the
//! `migrations/` directory. Each one runs exactly once, tracked via the
//! `schema_migrations` table.
//!
//! To add a new migration:
//! 1. Create `migrations/NNN_description.sql`
//! 2. Append it to the `MIGRATIONS` array below

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by version; never edit an entry once released.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

/// Single SQLite connection with the schema brought up to date.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the file at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        debug!("[Database] Opened {:?}", path);
        Self::prepare(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )?;

        let applied = self.schema_version()?;
        let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
        if pending.is_empty() {
            debug!("[Database] Schema at version {}", applied);
            return Ok(());
        }

        for migration in pending {
            info!("[Database] Applying migration {:03}_{}", migration.version, migration.name);
            self.transaction(|conn| {
                conn.execute_batch(migration.sql).with_context(|| {
                    format!("Migration {:03}_{} failed", migration.version, migration.name)
                })?;
                conn.execute(
                    "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, datetime('now'))",
                    rusqlite::params![migration.version, migration.name],
                )?;
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Highest applied migration, 0 for a fresh database.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` in a transaction, rolling back if it returns an error.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let result = f(&self.conn)?;
        tx.commit()?;
        Ok(result)
    }
}
