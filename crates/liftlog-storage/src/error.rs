//! Storage error types for liftlog-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: database and migration errors, entity-not-found variants, and
//! malformed stored values.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite operation failed.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A schema migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored date column did not parse.
    #[error("stored date is malformed: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A user with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// A program with the given ID was not found.
    #[error("program not found: {0}")]
    ProgramNotFound(i64),

    /// A logged session with the given ID was not found.
    #[error("session not found: {0}")]
    SessionNotFound(i64),

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
