//! The stage contract.
//!
//! This module defines the [`Stage`] trait that every pipeline stage
//! implements, and [`Next`], the single-use handle a stage uses to continue
//! the chain.
//!
//! # Example
//!
//! ```
//! use docket_core::{DocketResult, OperationRequest, OperationResult};
//! use docket_middleware::{BoxFuture, Next, Stage};
//!
//! struct LoggingStage;
//!
//! impl Stage for LoggingStage {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn invoke<'a>(
//!         &'a self,
//!         request: OperationRequest,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, DocketResult<OperationResult>> {
//!         Box::pin(async move {
//!             let kind = request.kind();
//!             let result = next.run(request).await;
//!             tracing::info!(operation = %kind, ok = result.is_ok(), "operation finished");
//!             result
//!         })
//!     }
//! }
//! ```

use docket_core::{BoxFuture, DocketError, DocketResult, OperationRequest, OperationResult};

/// A unit of work wrapped around the rest of the pipeline.
///
/// A stage receives the request and a [`Next`] for the remaining chain. It
/// may:
///
/// - inspect or replace the request before calling `next`
/// - call `next.run()` at most once (it consumes `next`)
/// - inspect or replace the result after `next` returns
/// - short-circuit by returning without calling `next`
///
/// # Invariants
///
/// - Stages hold no per-document state; one instance serves every call
///   concurrently.
/// - A stage that does not translate a failure returns it unchanged.
/// - Exactly one stage per pipeline is terminal, and it is last.
pub trait Stage: Send + Sync + 'static {
    /// Returns the name of this stage, used in logs and introspection.
    fn name(&self) -> &'static str;

    /// Returns true if this stage performs backend I/O and never calls `next`.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Processes one operation.
    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>>;
}

/// Handle to the remainder of the pipeline.
///
/// Consumed by [`run`](Self::run), so it can be used at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More stages to run.
    Chain {
        stage: &'a dyn Stage,
        next: Box<Next<'a>>,
    },
    /// Past the last stage.
    End,
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke `stage`, which in turn receives `next`.
    pub(crate) fn new(stage: &'a dyn Stage, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                stage,
                next: Box::new(next),
            },
        }
    }

    /// Creates the `Next` handed to the last stage.
    pub(crate) fn end() -> Self {
        Self {
            inner: NextInner::End,
        }
    }

    /// Returns the name of the stage this handle will invoke, if any.
    #[must_use]
    pub fn stage_name(&self) -> Option<&'static str> {
        match &self.inner {
            NextInner::Chain { stage, .. } => Some(stage.name()),
            NextInner::End => None,
        }
    }

    /// Invokes the remaining chain.
    ///
    /// Running past the last stage means the terminal stage delegated, which
    /// is a configuration error.
    pub async fn run(self, request: OperationRequest) -> DocketResult<OperationResult> {
        match self.inner {
            NextInner::Chain { stage, next } => stage.invoke(request, *next).await,
            NextInner::End => Err(DocketError::configuration(format!(
                "pipeline exhausted: no stage left to handle {} of '{}'",
                request.kind(),
                request.key()
            ))),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("stage", &self.stage_name())
            .finish()
    }
}

/// A stage built from a closure.
///
/// # Example
///
/// ```
/// use docket_middleware::FnStage;
///
/// let stage = FnStage::new("passthrough", |request, next| {
///     Box::pin(async move { next.run(request).await })
/// });
/// ```
pub struct FnStage<F> {
    name: &'static str,
    func: F,
}

impl<F> FnStage<F>
where
    F: for<'a> Fn(OperationRequest, Next<'a>) -> BoxFuture<'a, DocketResult<OperationResult>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new closure-backed stage.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Stage for FnStage<F>
where
    F: for<'a> Fn(OperationRequest, Next<'a>) -> BoxFuture<'a, DocketResult<OperationResult>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn invoke<'a>(
        &'a self,
        request: OperationRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, DocketResult<OperationResult>> {
        (self.func)(request, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::{DocumentKey, ErrorKind, Namespace};
    use std::sync::Mutex;

    fn get_request() -> OperationRequest {
        OperationRequest::get(
            Namespace::new("test").unwrap(),
            DocumentKey::new("k").unwrap(),
        )
    }

    struct RecordingStage {
        name: &'static str,
        log: Mutex<Vec<String>>,
    }

    impl Stage for RecordingStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn invoke<'a>(
            &'a self,
            request: OperationRequest,
            next: Next<'a>,
        ) -> BoxFuture<'a, DocketResult<OperationResult>> {
            Box::pin(async move {
                self.log.lock().unwrap().push(format!("{}:down", self.name));
                let result = next.run(request).await;
                self.log.lock().unwrap().push(format!("{}:up", self.name));
                result
            })
        }
    }

    struct AnswerStage;

    impl Stage for AnswerStage {
        fn name(&self) -> &'static str {
            "answer"
        }

        fn is_terminal(&self) -> bool {
            true
        }

        fn invoke<'a>(
            &'a self,
            _request: OperationRequest,
            _next: Next<'a>,
        ) -> BoxFuture<'a, DocketResult<OperationResult>> {
            Box::pin(async { Ok(OperationResult::NotFound) })
        }
    }

    #[tokio::test]
    async fn test_stage_name_and_default_terminal() {
        let stage = RecordingStage {
            name: "recording",
            log: Mutex::new(Vec::new()),
        };
        assert_eq!(stage.name(), "recording");
        assert!(!stage.is_terminal());
        assert!(AnswerStage.is_terminal());
    }

    #[tokio::test]
    async fn test_next_end_is_configuration_error() {
        let error = Next::end().run(get_request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_chain_wraps_inner_stage() {
        let stage = RecordingStage {
            name: "outer",
            log: Mutex::new(Vec::new()),
        };

        let terminal = Next::new(&AnswerStage, Next::end());
        assert_eq!(terminal.stage_name(), Some("answer"));
        let chain = Next::new(&stage, terminal);

        let result = chain.run(get_request()).await.unwrap();
        assert_eq!(result, OperationResult::NotFound);
        assert_eq!(*stage.log.lock().unwrap(), vec!["outer:down", "outer:up"]);
    }

    #[tokio::test]
    async fn test_fn_stage_can_short_circuit() {
        let stage = FnStage::new("cache", |_request, _next| {
            Box::pin(async { Ok(OperationResult::Done) })
        });
        assert_eq!(stage.name(), "cache");

        let chain = Next::new(&stage, Next::end());
        assert_eq!(chain.run(get_request()).await.unwrap(), OperationResult::Done);
    }
}
