//! Not-found suppression stage.
//!
//! The storage stage signals a missing key by failing with
//! [`DocketError::NotFound`]. This stage catches exactly that failure and
//! turns it into the outcome callers expect:
//!
//! | Operation | Inner result              | Returned                   |
//! |-----------|---------------------------|----------------------------|
//! | Get       | `Err(NotFound)`           | `Ok(OperationResult::NotFound)` |
//! | Delete    | `Err(NotFound)`           | `Ok(OperationResult::Done)`     |
//! | Put       | `Err(NotFound)`           | unchanged                  |
//! | any       | any other error or `Ok`   | unchanged                  |
//!
//! Its position relative to the serialization stage does not matter: the
//! serialization stage passes both `Err(NotFound)` and
//! `Ok(OperationResult::NotFound)` through untouched.

use crate::stage::{Next, Stage};
use docket_core::{
    BoxFuture, DocketError, DocketResult, OperationKind, OperationRequest, OperationResult,
};

/// Stage that downgrades "not found" to a non-error outcome for Get/Delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundStage;

impl NotFoundStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn translate(kind: OperationKind, error: DocketError) -> DocketResult<OperationResult> {
        match (kind, error) {
            (OperationKind::Get, DocketError::NotFound { namespace, key }) => {
                tracing::debug!(%namespace, %key, "get of absent document");
                Ok(OperationResult::NotFound)
            }
            (OperationKind::Delete, DocketError::NotFound { namespace, key }) => {
                tracing::debug!(%namespace, %key, "delete of absent document");
                Ok(OperationResult::Done)
            }
            (_, error) => Err(error),
        }
    }
}

impl Stage for NotFoundStage {
    fn name(&self) -> &'static str {
        "not_found"
    }

    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>> {
        Box::pin(async move {
            let kind = request.kind();
            match next.run(request).await {
                Err(error) => Self::translate(kind, error),
                ok => ok,
            }
        })
    }
}
