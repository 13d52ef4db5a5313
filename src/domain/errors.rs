//! Domain errors for the factlens system.

use thiserror::Error;

/// Domain-level errors that can occur in factlens.
///
/// "Not found" is deliberately absent: lookups return `Option` / `bool`
/// so callers can tell a missing report apart from a broken store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Upstream model failure: {0}")]
    UpstreamFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error comes from the persistence layer (row or blob).
    pub const fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::StorageError(_) | Self::SerializationError(_)
        )
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}
