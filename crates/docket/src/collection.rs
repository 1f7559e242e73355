//! Typed document collection.
//!
//! A [`DocumentCollection`] binds one [`Namespace`] to one shared
//! [`Pipeline`]. It is the only place where documents have a concrete Rust
//! type: values are turned into `serde_json::Value` on the way in and back
//! into `T` on the way out. Everything below it sees [`Payload`]s.

use docket_core::{
    DocketError, DocketResult, DocumentKey, Namespace, OperationRequest, OperationResult, Payload,
};
use crate::finite::check_finite;
use docket_middleware::Pipeline;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use std::sync::Arc;

/// Typed get/put/delete over one namespace.
///
/// Cloning is cheap; clones share the pipeline.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use docket::{DocumentCollection, Namespace, Pipeline};
/// use docket_storage::MemoryStorage;
///
/// # tokio_test::block_on(async {
/// let pipeline = Pipeline::builder()
///     .use_not_found()
///     .use_json()
///     .use_storage(Arc::new(MemoryStorage::new()))
///     .build()?;
/// let monitors = DocumentCollection::new(Namespace::new("httpmonitors")?, Arc::new(pipeline));
///
/// monitors.put("m1", &vec!["https://example.com"]).await?;
/// let urls: Option<Vec<String>> = monitors.get("m1").await?;
/// assert_eq!(urls, Some(vec!["https://example.com".to_string()]));
/// # Ok::<(), docket::DocketError>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DocumentCollection {
    namespace: Namespace,
    pipeline: Arc<Pipeline>,
}

impl DocumentCollection {
    /// Creates a collection over `namespace` using `pipeline`.
    pub fn new(namespace: Namespace, pipeline: Arc<Pipeline>) -> Self {
        Self {
            namespace,
            pipeline,
        }
    }

    /// Returns a collection over another namespace sharing this pipeline.
    #[must_use]
    pub fn with_namespace(&self, namespace: Namespace) -> Self {
        Self::new(namespace, Arc::clone(&self.pipeline))
    }

    /// Returns the namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Reads the document under `key`.
    ///
    /// Returns `Ok(None)` when the document does not exist and the pipeline
    /// suppresses not-found.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `key` is empty
    /// - `Serialization` if the stored document cannot become a `T`
    /// - `NotFound` if the pipeline does not suppress absence
    /// - `Configuration` if the pipeline has no serialization stage
    /// - any backend failure, unchanged
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> DocketResult<Option<T>> {
        let key = DocumentKey::new(key)?;
        let request = OperationRequest::get(self.namespace.clone(), key.clone());

        match self.pipeline.execute(request).await? {
            OperationResult::Found(Payload::Value(value)) => {
                serde_json::from_value(value).map(Some).map_err(|e| {
                    DocketError::serialization_with_source(
                        format!(
                            "document '{key}' in namespace '{}' is not a valid {}",
                            self.namespace,
                            type_name::<T>()
                        ),
                        e,
                    )
                })
            }
            OperationResult::NotFound => Ok(None),
            OperationResult::Found(Payload::Bytes(_)) => Err(DocketError::configuration(
                "get returned raw bytes; register a serialization stage",
            )),
            OperationResult::Done => Err(DocketError::configuration(
                "get completed without a document or a not-found outcome",
            )),
        }
    }

    /// Stores `value` under `key`, replacing any existing document.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `key` is empty, or with parameter `value` if
    ///   `value` serializes to null; the pipeline is not invoked in either case
    /// - `Serialization` if `value` cannot be serialized or holds a NaN or
    ///   infinite float; the pipeline is not invoked
    /// - any backend failure, unchanged
    pub async fn put<T>(&self, key: &str, value: &T) -> DocketResult<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        let key = DocumentKey::new(key)?;
        check_finite(value).map_err(|e| {
            DocketError::serialization_with_source(
                format!("failed to serialize {} under key '{key}'", type_name::<T>()),
                e,
            )
        })?;
        let value = serde_json::to_value(value).map_err(|e| {
            DocketError::serialization_with_source(
                format!("failed to serialize {}", type_name::<T>()),
                e,
            )
        })?;

        if value.is_null() {
            tracing::debug!(namespace = %self.namespace, %key, "rejected null document");
            return Err(DocketError::invalid_argument("value", "document must not be null"));
        }

        let request = OperationRequest::put(self.namespace.clone(), key, Payload::Value(value));
        self.expect_done(request).await
    }

    /// Deletes the document under `key`.
    ///
    /// Deleting a missing document succeeds when the pipeline suppresses
    /// not-found.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `key` is empty
    /// - `NotFound` if the document is missing and absence is not suppressed
    /// - any backend failure, unchanged
    pub async fn delete(&self, key: &str) -> DocketResult<()> {
        let key = DocumentKey::new(key)?;
        let request = OperationRequest::delete(self.namespace.clone(), key);
        self.expect_done(request).await
    }

    async fn expect_done(&self, request: OperationRequest) -> DocketResult<()> {
        let kind = request.kind();
        match self.pipeline.execute(request).await? {
            OperationResult::Done => Ok(()),
            other => Err(DocketError::configuration(format!(
                "{kind} completed with unexpected outcome '{}'",
                other.outcome()
            ))),
        }
    }
}
