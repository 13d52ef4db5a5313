//! Report persistence service.
//!
//! A saved report is two halves: a metadata row behind [`ReportRepository`]
//! and an HTML blob behind [`BlobStore`]. The blob is written first and the
//! row second, so a row never points at a blob that was not written.

use chrono::{SubsecRound, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NewReport, Pagination, Report, SavedReport};
use crate::domain::ports::{BlobStore, ReportRepository};

pub struct ReportStore {
    repository: Arc<dyn ReportRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl ReportStore {
    pub fn new(repository: Arc<dyn ReportRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { repository, blobs }
    }

    /// Persist a report. A failed blob write inserts no row; a failed insert
    /// after the blob write leaves the blob behind as an orphan. A NaN or
    /// infinite score is rejected before anything is written.
    #[instrument(skip(self, report), fields(url = %report.url))]
    pub async fn save(&self, report: NewReport) -> DomainResult<SavedReport> {
        if !report.score.is_finite() {
            return Err(DomainError::ValidationFailed(format!(
                "score must be a finite number, got {}",
                report.score
            )));
        }

        let id = Uuid::new_v4();
        // Stored timestamps carry microseconds; truncate so the returned
        // value matches what a later get() reads back.
        let timestamp = Utc::now().trunc_subsecs(6);
        let path = self.blobs.path_for(id);

        self.blobs.write(&path, &report.html).await?;

        let row = Report {
            id,
            timestamp,
            url: report.url,
            title: report.title,
            score: report.score,
            file_path: path.to_string_lossy().into_owned(),
        };

        if let Err(e) = self.repository.insert(&row).await {
            warn!(path = %path.display(), error = %e, "report row insert failed, blob left orphaned");
            return Err(e);
        }

        info!(%id, "saved report");
        Ok(SavedReport {
            id,
            timestamp,
            file_path: row.file_path,
        })
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Option<Report>> {
        self.repository.get(id).await
    }

    /// HTML body of a saved report. A row whose blob has gone missing reads
    /// as not found.
    pub async fn get_html(&self, id: Uuid) -> DomainResult<Option<String>> {
        let Some(report) = self.repository.get(id).await? else {
            return Ok(None);
        };

        let html = self.blobs.read(Path::new(&report.file_path)).await?;
        if html.is_none() {
            warn!(%id, path = %report.file_path, "report row has no blob");
        }
        Ok(html)
    }

    pub async fn list(&self, page: Pagination) -> DomainResult<Vec<Report>> {
        self.repository.list(page).await
    }

    /// Remove both halves. Returns `false` when no such report exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let Some(report) = self.repository.get(id).await? else {
            return Ok(false);
        };

        if !self.blobs.remove(Path::new(&report.file_path)).await? {
            warn!(%id, path = %report.file_path, "blob already missing on delete");
        }
        self.repository.delete(id).await?;

        info!(%id, "deleted report");
        Ok(true)
    }

    pub async fn count(&self) -> DomainResult<i64> {
        self.repository.count().await
    }
}
