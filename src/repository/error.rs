//! Repository Errors
//!
//! Error types for persistence operations.

use uuid::Uuid;

use crate::domain::DomainError;

/// Errors that can occur in a repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A cart was handed to storage before its totals were recomputed
    #[error("Cart for user {0} has stale totals")]
    StaleCart(Uuid),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Data rejected by domain validation before it was written
    #[error(transparent)]
    Invalid(DomainError),

    /// Stored data could not be mapped onto a domain type
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                )
            }
            _ => RepositoryError::Database(err),
        }
    }
}

impl RepositoryError {
    /// Check if this error is a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepositoryError::UniqueViolation(_))
    }
}
