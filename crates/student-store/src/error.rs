use thiserror::Error;

use crate::StudentId;

/// Errors that can occur when reading or committing student records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or delete targeted a student that does not exist.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// A record failed validation before being written.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The store refused to commit the unit of work.
    #[error("Commit rejected: {0}")]
    CommitRejected(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
