//! Typed repositories over a [`DocumentCollection`].
//!
//! Each repository owns one namespace and keys documents by the monitor id
//! in hyphenated form. Absence and idempotent delete come from the
//! collection's pipeline, which is expected to suppress not-found.

use crate::models::{HttpMonitor, HttpMonitorCheckResult, HttpMonitorId};
use docket::{DocketResult, DocumentCollection, Namespace, Pipeline};
use std::sync::Arc;

/// Namespace holding [`HttpMonitor`] documents.
pub const HTTP_MONITORS: &str = "httpmonitors";

/// Namespace holding the latest [`HttpMonitorCheckResult`] per monitor.
pub const HTTP_MONITOR_CHECK_RESULTS: &str = "httpmonitorcheckresults";

/// Get/put/delete of [`HttpMonitor`]s.
#[derive(Debug, Clone)]
pub struct HttpMonitorRepository {
    documents: DocumentCollection,
}

impl HttpMonitorRepository {
    /// Creates a repository over `documents`, using its namespace as is.
    pub fn new(documents: DocumentCollection) -> Self {
        Self { documents }
    }

    /// Creates a repository bound to [`HTTP_MONITORS`] on `pipeline`.
    pub fn from_pipeline(pipeline: Arc<Pipeline>) -> DocketResult<Self> {
        let namespace = Namespace::new(HTTP_MONITORS)?;
        Ok(Self::new(DocumentCollection::new(namespace, pipeline)))
    }

    /// Reads the monitor with `id`, or `None` if it does not exist.
    pub async fn get(&self, id: &HttpMonitorId) -> DocketResult<Option<HttpMonitor>> {
        self.documents.get(&id.to_string()).await
    }

    /// Creates or replaces `monitor`.
    pub async fn put(&self, monitor: &HttpMonitor) -> DocketResult<()> {
        self.documents.put(&monitor.id.to_string(), monitor).await?;
        tracing::debug!(monitor_id = %monitor.id, url = %monitor.url, "stored http monitor");
        Ok(())
    }

    /// Deletes the monitor with `id`. Deleting a missing monitor succeeds.
    pub async fn delete(&self, id: &HttpMonitorId) -> DocketResult<()> {
        self.documents.delete(&id.to_string()).await
    }
}

/// Latest [`HttpMonitorCheckResult`] per monitor.
#[derive(Debug, Clone)]
pub struct HttpMonitorCheckResultRepository {
    documents: DocumentCollection,
}

impl HttpMonitorCheckResultRepository {
    /// Creates a repository over `documents`, using its namespace as is.
    pub fn new(documents: DocumentCollection) -> Self {
        Self { documents }
    }

    /// Creates a repository bound to [`HTTP_MONITOR_CHECK_RESULTS`] on
    /// `pipeline`.
    pub fn from_pipeline(pipeline: Arc<Pipeline>) -> DocketResult<Self> {
        let namespace = Namespace::new(HTTP_MONITOR_CHECK_RESULTS)?;
        Ok(Self::new(DocumentCollection::new(namespace, pipeline)))
    }

    /// Reads the most recently recorded result for `id`.
    pub async fn latest(&self, id: &HttpMonitorId) -> DocketResult<Option<HttpMonitorCheckResult>> {
        self.documents.get(&id.to_string()).await
    }

    /// Records `result` as the latest for its monitor, replacing the
    /// previous one.
    pub async fn record(&self, result: &HttpMonitorCheckResult) -> DocketResult<()> {
        self.documents
            .put(&result.http_monitor_id.to_string(), result)
            .await?;
        tracing::debug!(
            monitor_id = %result.http_monitor_id,
            status = result.http_status_code,
            "recorded check result"
        );
        Ok(())
    }

    /// Forgets the latest result for `id`.
    pub async fn clear(&self, id: &HttpMonitorId) -> DocketResult<()> {
        self.documents.delete(&id.to_string()).await
    }
}
