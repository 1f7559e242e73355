//! Uptime-monitor domain on top of Docket.
//!
//! [`HttpMonitor`]s and their [`HttpMonitorCheckResult`]s are stored as JSON
//! documents through typed repositories. Identifiers are validated on
//! construction: an [`HttpMonitorId`] never wraps the nil UUID.
//!
//! ```rust,ignore
//! use docket_uptime::{HttpMonitor, HttpMonitorId, HttpMonitorRepository};
//!
//! let monitors = HttpMonitorRepository::from_pipeline(pipeline)?;
//! let monitor = HttpMonitor::new(HttpMonitorId::create(), "https://example.com")?;
//! monitors.put(&monitor).await?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod models;
pub mod repository;

pub use models::{parse_monitor_url, HttpMonitor, HttpMonitorCheckResult, HttpMonitorId};
pub use repository::{
    HttpMonitorCheckResultRepository, HttpMonitorRepository, HTTP_MONITORS,
    HTTP_MONITOR_CHECK_RESULTS,
};
