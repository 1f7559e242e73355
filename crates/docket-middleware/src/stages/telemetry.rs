//! Telemetry stage.
//!
//! Wraps the rest of the chain in a `docket.operation` span, then records
//! the outcome:
//!
//! - `docket_operations_total{operation, outcome}`
//! - `docket_operation_duration_seconds{operation}`
//! - one `debug` log per operation, `warn` on failure
//!
//! The outcome label is `found`, `not_found` or `done` for successes, and
//! the error kind otherwise. Registered outermost, it observes what the
//! caller sees; registered inside the not-found stage, it observes raw
//! storage absence. It never changes a request or a result.

use crate::stage::{Next, Stage};
use docket_core::{BoxFuture, DocketResult, OperationRequest, OperationResult};
use docket_telemetry::record_operation;
use std::time::Instant;
use tracing::Instrument;

/// Observational stage emitting logs and metrics for every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryStage;

impl TelemetryStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Stage for TelemetryStage {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>> {
        let kind = request.kind();
        let span = tracing::debug_span!(
            "docket.operation",
            operation = %kind,
            namespace = %request.namespace(),
            key = %request.key(),
        );

        Box::pin(
            async move {
                let start = Instant::now();
                let result = next.run(request).await;
                let duration = start.elapsed();
                let duration_ms = duration.as_secs_f64() * 1000.0;

                match &result {
                    Ok(outcome) => {
                        record_operation(kind.as_str(), outcome.outcome(), duration);
                        tracing::debug!(
                            outcome = outcome.outcome(),
                            duration_ms,
                            "operation completed"
                        );
                    }
                    Err(error) => {
                        record_operation(kind.as_str(), error.kind().as_str(), duration);
                        tracing::warn!(
                            outcome = error.kind().as_str(),
                            duration_ms,
                            error = %error,
                            "operation failed"
                        );
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
