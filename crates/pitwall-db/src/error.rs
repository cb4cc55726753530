//! # Database Error Types
//!
//! ```text
//! sqlx::Error ──► DbError ──► ServiceError::Store (passed through untouched)
//! ```
//!
//! An empty lookup is NOT an error at this layer: stores answer with
//! `Option`/`Vec` and the services decide what "nothing found" means.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Store-tier failures.
#[derive(Debug, Error)]
pub enum DbError {
    /// `delete` on an unknown id, or a row that vanished between `save`
    /// and its re-read.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE column already holds the value (team name, user email).
    /// `column` is SQLite's `table.column`.
    #[error("Unique constraint failed on {column}")]
    UniqueViolation { column: String },

    /// A reference points at a missing row, or a delete would orphan one.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure, NOT NULL included.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored value could not be turned back into an entity.
    #[error("Corrupt {entity} row: {reason}")]
    CorruptRow { entity: String, reason: String },

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn corrupt(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// The `table.column` SQLite names after "constraint failed: ".
fn constraint_target(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| message.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    column: constraint_target(db_err.message()),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
