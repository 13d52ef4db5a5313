//! SQLite implementation of the ReportRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::report::format_timestamp;
use crate::domain::models::{Pagination, Report};
use crate::domain::ports::ReportRepository;

const REPORT_COLUMNS: &str = "id, timestamp, url, title, score, file_path";

pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn insert(&self, report: &Report) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO reports (id, timestamp, url, title, score, file_path) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(report.id.to_string())
        .bind(format_timestamp(&report.timestamp))
        .bind(&report.url)
        .bind(&report.title)
        .bind(report.score)
        .bind(&report.file_path)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Report>> {
        let row: Option<ReportRow> = sqlx::query_as(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, page: Pagination) -> DomainResult<Vec<Report>> {
        // rowid breaks ties between saves that share a timestamp.
        let rows: Vec<ReportRow> = sqlx::query_as(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY timestamp DESC, rowid DESC LIMIT ? OFFSET ?"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: String,
    timestamp: String,
    url: String,
    title: String,
    score: f64,
    file_path: String,
}

impl TryFrom<ReportRow> for Report {
    type Error = DomainError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            timestamp: parse_datetime(&row.timestamp)?,
            url: row.url,
            title: row.title,
            score: row.score,
            file_path: row.file_path,
        })
    }
}
