//! Embedded schema migrations for the reports database.
//!
//! Applied versions are tracked in `schema_migrations`. Migration SQL uses
//! `IF NOT EXISTS` and version rows are written with `INSERT OR IGNORE`, so
//! two processes initializing the same file at once both succeed.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        version: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to read schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One schema step compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Create reports table",
    sql: include_str!("../../../migrations/001_create_reports.sql"),
}];

/// All migrations, oldest first.
pub fn all_embedded_migrations() -> &'static [Migration] {
    MIGRATIONS
}

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version and
    /// return how many ran.
    pub async fn run_embedded_migrations(&self, migrations: &[Migration]) -> Result<usize, MigrationError> {
        self.ensure_version_table().await?;
        let current = self.get_current_version().await?;

        let mut applied = 0;
        for migration in migrations.iter().filter(|m| m.version > current) {
            self.apply(migration).await?;
            info!(
                version = migration.version,
                description = migration.description,
                "applied migration"
            );
            applied += 1;
        }

        if applied == 0 {
            debug!(version = current, "schema up to date");
        }
        Ok(applied)
    }

    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let (version,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(MigrationError::VersionCheckError)?;
        Ok(version)
    }

    async fn ensure_version_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|source| MigrationError::ExecutionError { version: 0, source })
    }

    async fn apply(&self, migration: &Migration) -> Result<(), MigrationError> {
        let version = migration.version;
        let failed = |source: sqlx::Error| MigrationError::ExecutionError { version, source };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::raw_sql(migration.sql).execute(&mut *tx).await.map_err(failed)?;
        sqlx::query("INSERT OR IGNORE INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await.map_err(failed)
    }
}
