//! Persisted report models.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Default page size for report listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Metadata row for a saved report. The HTML body lives in the blob at
/// `file_path` and is never part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub title: String,
    pub score: f64,
    pub file_path: String,
}

impl Report {
    /// Canonical timestamp encoding. Fixed width with a `Z` suffix, so string
    /// order in the database matches chronological order.
    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Input to `ReportStore::save`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub url: String,
    pub title: String,
    pub score: f64,
    pub html: String,
}

impl NewReport {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        score: f64,
        html: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            score,
            html: html.into(),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub file_path: String,
}

/// Validated limit/offset pair for listing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> DomainResult<Self> {
        if limit < 0 {
            return Err(DomainError::ValidationFailed(format!(
                "limit must be a non-negative integer, got {limit}"
            )));
        }
        if offset < 0 {
            return Err(DomainError::ValidationFailed(format!(
                "offset must be a non-negative integer, got {offset}"
            )));
        }
        Ok(Self { limit, offset })
    }

    pub const fn limit(&self) -> i64 {
        self.limit
    }

    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::default();
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_pagination_rejects_negative_values() {
        assert!(Pagination::new(-1, 0).is_err());
        assert!(Pagination::new(10, -5).is_err());
        assert!(Pagination::new(0, 0).is_ok());
    }

    #[test]
    fn test_timestamp_format_sorts_lexically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let a = format_timestamp(&earlier);
        let b = format_timestamp(&later);
        assert!(a < b);
        assert!(a.ends_with('Z'));
        assert_eq!(a.len(), b.len());
    }
}
