//! Database Module
//!
//! Handles the SQLite connection pool and migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database service - owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and apply migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::database(format!("Failed to create database dir: {e}")))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            busy_timeout_ms = BUSY_TIMEOUT.as_millis() as u64,
            "Database connection established (SQLite WAL)"
        );

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Single-connection in-memory database, migrated
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .foreign_keys(true);

        // One connection that never expires; every new connection would be a new database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_every_connection_waits_on_locks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menu.db");
        let db = DbService::new(&path.to_string_lossy()).await.unwrap();

        // Hold several connections at once so each is a distinct one
        let mut held = Vec::new();
        for _ in 0..3 {
            let mut conn = db.pool.acquire().await.unwrap();
            let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
                .fetch_one(&mut *conn)
                .await
                .unwrap();
            assert_eq!(timeout, 5000);
            held.push(conn);
        }
    }
}
