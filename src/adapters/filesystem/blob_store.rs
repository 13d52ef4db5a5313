//! Report HTML blobs on the local filesystem.
//!
//! Each report gets `report_<id>.html` under the configured directory.
//! Writes land in a sibling temp file first and are renamed into place, so a
//! reader never observes a half-written report.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::BlobStore;

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// A relative `root` is resolved against the current directory here, so
    /// the paths handed out by `path_for` stay valid from any later cwd.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            root: std::path::absolute(&root).unwrap_or(root),
        }
    }

    /// Create the blob directory if it does not exist yet.
    pub async fn init(&self) -> DomainResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DomainError::StorageError(format!(
                "Failed to create report directory {}: {e}",
                self.root.display()
            ))
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("report_{id}.html"))
    }

    async fn write(&self, path: &Path, contents: &str) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::StorageError(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DomainError::StorageError(format!("Invalid blob path {}", path.display())))?;
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        if let Err(e) = tokio::fs::write(&tmp_path, contents).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(DomainError::StorageError(format!(
                "Failed to write {}: {e}",
                tmp_path.display()
            )));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(DomainError::StorageError(format!(
                "Failed to move report into {}: {e}",
                path.display()
            )));
        }

        debug!(path = %path.display(), bytes = contents.len(), "wrote report blob");
        Ok(())
    }

    async fn read(&self, path: &Path) -> DomainResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::StorageError(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn remove(&self, path: &Path) -> DomainResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::StorageError(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}
