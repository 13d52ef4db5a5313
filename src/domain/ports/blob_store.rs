use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Blob half of report persistence: one HTML artifact per report id.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Deterministic location of the blob for `id`.
    fn path_for(&self, id: Uuid) -> PathBuf;

    /// Write the blob completely or not at all.
    async fn write(&self, path: &Path, contents: &str) -> DomainResult<()>;

    /// `Ok(None)` when the blob does not exist.
    async fn read(&self, path: &Path) -> DomainResult<Option<String>>;

    /// Returns whether a blob was removed. A missing blob is not an error.
    async fn remove(&self, path: &Path) -> DomainResult<bool>;
}
