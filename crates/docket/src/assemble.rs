//! Wiring a [`DocketConfig`] into a running collection.
//!
//! The pipeline built from a [`PipelineConfig`] always has this shape, with
//! the optional stages omitted when switched off:
//!
//! ```text
//! [Telemetry] → [NotFound] → Serialization(json | pretty json) → Storage
//! ```

use docket_config::{DocketConfig, PipelineConfig, StorageBackend, StorageConfig};
use docket_core::{DocketError, DocketResult, Namespace};
use docket_middleware::{JsonCodec, Pipeline, SerializationStage};
use docket_storage::{FsStorage, MemoryStorage, StorageClient};
use std::sync::Arc;

use crate::DocumentCollection;

/// Creates the storage client selected by `config`.
///
/// # Errors
///
/// Returns a configuration error if the filesystem backend has no root.
pub fn storage_from_config(config: &StorageConfig) -> DocketResult<Arc<dyn StorageClient>> {
    let client: Arc<dyn StorageClient> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Filesystem => {
            let root = config.root.as_ref().ok_or_else(|| {
                DocketError::configuration("storage.root is required for the filesystem backend")
            })?;
            Arc::new(FsStorage::new(root))
        }
    };

    tracing::debug!(backend = config.backend.as_str(), "storage client created");
    Ok(client)
}

/// Builds a pipeline over `storage` from `config`.
///
/// # Errors
///
/// Propagates pipeline build errors.
pub fn pipeline_from_config(
    config: &PipelineConfig,
    storage: Arc<dyn StorageClient>,
) -> DocketResult<Pipeline> {
    let mut builder = Pipeline::builder();

    if config.telemetry {
        builder = builder.use_telemetry();
    }
    if config.suppress_not_found {
        builder = builder.use_not_found();
    }
    builder = if config.pretty_json {
        builder.stage(SerializationStage::new(JsonCodec::pretty()))
    } else {
        builder.use_json()
    };

    builder.use_storage(storage).build()
}

/// Validates `config` and builds a collection bound to
/// `config.storage.namespace`.
///
/// With `metrics.enabled`, the Prometheus recorder is installed first; see
/// [`docket_telemetry::render_metrics`] for the exposition.
///
/// # Errors
///
/// Returns a configuration error if `config` does not validate or another
/// metrics recorder is already installed, and propagates storage and
/// pipeline construction errors.
///
/// # Example
///
/// ```
/// use docket::assemble::collection_from_config;
/// use docket_config::DocketConfig;
///
/// let documents = collection_from_config(&DocketConfig::default()).unwrap();
/// assert_eq!(documents.namespace().as_str(), "documents");
/// ```
pub fn collection_from_config(config: &DocketConfig) -> DocketResult<DocumentCollection> {
    config
        .validate()
        .map_err(|e| DocketError::configuration(e.to_string()))?;
    docket_telemetry::init_metrics(&config.metrics.to_metrics_config())
        .map_err(|e| DocketError::configuration(e.to_string()))?;

    let storage = storage_from_config(&config.storage)?;
    let pipeline = pipeline_from_config(&config.pipeline, storage)?;
    let namespace = Namespace::new(config.storage.namespace.clone())?;

    tracing::info!(
        namespace = %namespace,
        backend = config.storage.backend.as_str(),
        stages = ?pipeline.stage_names(),
        metrics = config.metrics.enabled,
        "document collection ready"
    );

    Ok(DocumentCollection::new(namespace, Arc::new(pipeline)))
}
