//! Common test utilities for integration tests
//!
//! Provides shared fixtures used across multiple integration test files.

use std::sync::Arc;
use tempfile::TempDir;

use factlens::adapters::filesystem::FsBlobStore;
use factlens::adapters::sqlite::{create_migrated_test_pool, SqliteReportRepository};
use factlens::services::ReportStore;

/// Report store over an in-memory database and a temporary blob directory.
///
/// Keep the returned TempDir alive for the duration of the test.
pub async fn report_store() -> (TempDir, ReportStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    let store = ReportStore::new(
        Arc::new(SqliteReportRepository::new(pool)),
        Arc::new(FsBlobStore::new(dir.path().join("reports"))),
    );
    (dir, store)
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
