use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Pagination, Report};

/// Metadata half of report persistence.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: &Report) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Report>>;

    /// Most recent first.
    async fn list(&self, page: Pagination) -> DomainResult<Vec<Report>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<i64>;
}
