//! Repository Module
//!
//! Free functions over a `SqlitePool` (or any SQLite executor when the
//! caller needs a transaction), one module per table.

pub mod category;
pub mod dining_table;
pub mod meal;
pub mod meal_size_cost;

use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
