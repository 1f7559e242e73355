//! Storage stage (terminal).
//!
//! Translates each operation into one call on a [`StorageClient`]:
//!
//! | Operation | Client call | Result                                   |
//! |-----------|-------------|------------------------------------------|
//! | Get       | `read`      | `Found(Payload::Bytes)` or `Err(NotFound)` |
//! | Put       | `write`     | `Done` (overwrites)                      |
//! | Delete    | `delete`    | `Done` or `Err(NotFound)`                |
//!
//! This stage never calls `next`.

use crate::stage::{Next, Stage};
use docket_core::{
    BoxFuture, DocketError, DocketResult, OperationKind, OperationRequest, OperationResult,
    Payload,
};
use docket_storage::StorageClient;
use std::sync::Arc;

/// Terminal stage that performs backend I/O.
#[derive(Clone)]
pub struct StorageStage {
    client: Arc<dyn StorageClient>,
}

impl StorageStage {
    /// Creates a storage stage over `client`.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Returns the storage client.
    pub fn client(&self) -> &Arc<dyn StorageClient> {
        &self.client
    }

    async fn perform(&self, request: OperationRequest) -> DocketResult<OperationResult> {
        let namespace = request.namespace();
        let key = request.key();

        match request.kind() {
            OperationKind::Get => {
                let bytes = self.client.read(namespace, key).await?;
                Ok(OperationResult::Found(Payload::Bytes(bytes)))
            }
            OperationKind::Put => {
                let bytes = match request.payload() {
                    Some(Payload::Bytes(bytes)) => bytes.clone(),
                    Some(Payload::Value(_)) => {
                        return Err(DocketError::configuration(
                            "storage stage received a structured payload; \
                             register a serialization stage before it",
                        ))
                    }
                    None => {
                        return Err(DocketError::invalid_argument(
                            "payload",
                            "put requires a payload",
                        ))
                    }
                };
                self.client.write(namespace, key, bytes).await?;
                Ok(OperationResult::Done)
            }
            OperationKind::Delete => {
                self.client.delete(namespace, key).await?;
                Ok(OperationResult::Done)
            }
        }
    }
}

impl std::fmt::Debug for StorageStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageStage")
            .field("client", &self.client.name())
            .finish()
    }
}

impl Stage for StorageStage {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        _next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>> {
        Box::pin(async move {
            let kind = request.kind();
            let result = self.perform(request).await;
            if let Err(error) = &result {
                if !error.is_not_found() {
                    tracing::warn!(
                        client = self.client.name(),
                        operation = %kind,
                        error = %error,
                        "storage operation failed"
                    );
                }
            }
            result
        })
    }
}
