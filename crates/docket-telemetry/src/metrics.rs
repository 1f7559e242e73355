//! Operation metrics for Docket.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `docket_operations_total` | Counter | `operation`, `outcome` | Completed operations |
//! | `docket_operation_duration_seconds` | Histogram | `operation` | Operation latency |
//!
//! Recording is a no-op until a recorder is installed, either by
//! [`init_metrics`] or by the embedding process.

use crate::error::TelemetryError;
use crate::logging::fields;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Counter of completed operations.
pub const OPERATIONS_TOTAL: &str = "docket_operations_total";

/// Histogram of operation latency in seconds.
pub const OPERATION_DURATION_SECONDS: &str = "docket_operation_duration_seconds";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Whether to install the Prometheus recorder.
    pub enabled: bool,
}

/// Installs a Prometheus recorder and registers metric descriptions.
///
/// The rendered exposition is available through [`render_metrics`]; serving
/// it is left to the embedding process.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if another global recorder is
/// already set. Calling it again after a successful install is a no-op.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled || METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    let _ = METRICS_HANDLE.set(handle);

    describe_counter!(OPERATIONS_TOTAL, "Total number of document operations by outcome");
    describe_histogram!(
        OPERATION_DURATION_SECONDS,
        "Document operation duration in seconds"
    );

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if [`init_metrics`] has not installed a recorder.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Records a completed operation.
///
/// * `operation` - "get", "put" or "delete"
/// * `outcome` - "found", "not_found", "done", or an error kind
pub fn record_operation(operation: &'static str, outcome: &'static str, duration: Duration) {
    counter!(OPERATIONS_TOTAL, fields::OPERATION => operation, fields::OUTCOME => outcome)
        .increment(1);
    histogram!(OPERATION_DURATION_SECONDS, fields::OPERATION => operation)
        .record(duration.as_secs_f64());
}
