//! SQLite database adapters for factlens.

pub mod connection;
pub mod migrations;
pub mod report_repository;

pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use report_repository::SqliteReportRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Decode a report id column.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Decode a timestamp column written by [`format_timestamp`].
///
/// [`format_timestamp`]: crate::domain::models::report::format_timestamp
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::SerializationError(format!("bad timestamp {s:?}: {e}")))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] MigrationError),
}

/// Open the database and bring the schema up to date.
pub async fn initialize_database(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, DatabaseError> {
    migrated(create_pool(database_url, config).await?).await
}

/// In-memory pool with the full schema, for tests.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    migrated(create_test_pool().await?).await
}

async fn migrated(pool: SqlitePool) -> Result<SqlitePool, DatabaseError> {
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers_reject_garbage() {
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_datetime("yesterday").is_err());
        assert!(parse_datetime("2024-05-01T12:00:00.000000Z").is_ok());
    }

    #[tokio::test]
    async fn test_initialize_database_twice() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("factlens.db").display());

        let pool = initialize_database(&url, None).await.unwrap();
        pool.close().await;
        initialize_database(&url, None).await.unwrap();
    }
}
