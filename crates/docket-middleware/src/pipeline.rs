//! Pipeline composition.
//!
//! [`PipelineBuilder`] collects stage factories in caller-declared order;
//! [`PipelineBuilder::build`] instantiates them, checks the terminal-stage
//! invariant and freezes the result into an immutable [`Pipeline`].
//!
//! Each call to [`Pipeline::execute`] folds the frozen stages right-to-left
//! into nested [`Next`] handles, so a stage registered earlier wraps every
//! stage registered after it.

use crate::stage::{Next, Stage};
use crate::stages::{NotFoundStage, SerializationStage, StorageStage, TelemetryStage};
use docket_core::{DocketError, DocketResult, OperationRequest, OperationResult};
use docket_storage::StorageClient;
use std::sync::Arc;

/// A type-erased stage that can be stored in a vector.
pub type BoxedStage = Arc<dyn Stage>;

/// A deferred stage constructor.
type StageFactory = Box<dyn FnOnce() -> BoxedStage + Send>;

/// An immutable, composed chain of stages.
///
/// A `Pipeline` is `Send + Sync`; share it behind an `Arc` and invoke it
/// concurrently from any number of tasks.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use docket_core::{DocumentKey, Namespace, OperationRequest, OperationResult};
/// use docket_middleware::Pipeline;
/// use docket_storage::MemoryStorage;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let pipeline = Pipeline::builder()
///     .use_not_found()
///     .use_json()
///     .use_storage(Arc::new(MemoryStorage::new()))
///     .build()
///     .unwrap();
///
/// let request = OperationRequest::get(
///     Namespace::new("monitors").unwrap(),
///     DocumentKey::new("missing").unwrap(),
/// );
/// assert_eq!(pipeline.execute(request).await.unwrap(), OperationResult::NotFound);
/// # });
/// ```
pub struct Pipeline {
    stages: Vec<BoxedStage>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs one operation through every stage.
    pub async fn execute(&self, request: OperationRequest) -> DocketResult<OperationResult> {
        self.build_chain().run(request).await
    }

    fn build_chain(&self) -> Next<'_> {
        let mut next = Next::end();
        for stage in self.stages.iter().rev() {
            next = Next::new(stage.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
///
/// Registration order is execution order for the request; the result
/// unwinds in reverse.
#[derive(Default)]
pub struct PipelineBuilder {
    factories: Vec<StageFactory>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage factory. The factory runs once, in `build()`.
    #[must_use]
    pub fn register<F, S>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> S + Send + 'static,
        S: Stage,
    {
        self.factories
            .push(Box::new(move || Arc::new(factory()) as BoxedStage));
        self
    }

    /// Appends an already-constructed stage.
    #[must_use]
    pub fn stage<S: Stage>(self, stage: S) -> Self {
        self.register(move || stage)
    }

    /// Appends a [`NotFoundStage`].
    #[must_use]
    pub fn use_not_found(self) -> Self {
        self.register(NotFoundStage::new)
    }

    /// Appends a [`SerializationStage`] using compact JSON.
    #[must_use]
    pub fn use_json(self) -> Self {
        self.register(SerializationStage::json)
    }

    /// Appends a [`TelemetryStage`].
    #[must_use]
    pub fn use_telemetry(self) -> Self {
        self.register(TelemetryStage::new)
    }

    /// Appends the terminal [`StorageStage`] for `client`.
    #[must_use]
    pub fn use_storage(self, client: Arc<dyn StorageClient>) -> Self {
        self.register(move || StorageStage::new(client))
    }

    /// Instantiates every stage and freezes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if there is no terminal stage, more
    /// than one, or the terminal stage is not registered last.
    pub fn build(self) -> DocketResult<Pipeline> {
        let stages: Vec<BoxedStage> = self
            .factories
            .into_iter()
            .map(|factory| factory())
            .collect();

        let terminals: Vec<usize> = stages
            .iter()
            .enumerate()
            .filter(|(_, stage)| stage.is_terminal())
            .map(|(index, _)| index)
            .collect();

        match terminals.as_slice() {
            [] => {
                return Err(DocketError::configuration(
                    "pipeline has no terminal stage; register a storage stage last",
                ))
            }
            [index] if *index + 1 != stages.len() => {
                return Err(DocketError::configuration(format!(
                    "terminal stage '{}' must be registered last",
                    stages[*index].name()
                )))
            }
            [_] => {}
            many => {
                return Err(DocketError::configuration(format!(
                    "pipeline has {} terminal stages; exactly one is allowed",
                    many.len()
                )))
            }
        }

        let pipeline = Pipeline { stages };
        tracing::debug!(stages = ?pipeline.stage_names(), "pipeline built");
        Ok(pipeline)
    }
}
