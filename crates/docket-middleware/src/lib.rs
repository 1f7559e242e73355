//! # Docket Middleware
//!
//! The stage pipeline that every document operation flows through.
//!
//! A pipeline is an ordered chain of [`Stage`]s ending in exactly one
//! terminal stage. Each stage wraps the ones registered after it: the request
//! travels down in registration order, the result travels back up in reverse.
//!
//! ```text
//! Collection → NotFound → Serialization → Storage ─┐
//!                                                  │ backend I/O
//! Collection ← NotFound ← Serialization ← Storage ←┘
//! ```
//!
//! ## Built-in Stages
//!
//! | Stage                    | Purpose                                          |
//! |--------------------------|--------------------------------------------------|
//! | [`NotFoundStage`]        | Turns "not found" into an empty Get / no-op Delete |
//! | [`SerializationStage`]   | Structured value ↔ bytes via a [`Codec`]         |
//! | [`TelemetryStage`]       | Per-operation log line and metrics               |
//! | [`StorageStage`]         | Terminal: reads/writes/deletes via a storage client |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use docket_middleware::Pipeline;
//! use docket_storage::MemoryStorage;
//!
//! let pipeline = Pipeline::builder()
//!     .use_not_found()
//!     .use_json()
//!     .use_storage(Arc::new(MemoryStorage::new()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(pipeline.stage_names(), vec!["not_found", "serialization", "storage"]);
//! ```
//!
//! ## Writing a Stage
//!
//! New stages implement [`Stage`] (or wrap a closure in [`FnStage`]) and are
//! added with [`PipelineBuilder::register`]; neither the engine nor the
//! existing stages change.

#![doc(html_root_url = "https://docs.rs/docket-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod stage;
pub mod stages;

// Re-export main types at crate root
pub use docket_core::BoxFuture;
pub use pipeline::{BoxedStage, Pipeline, PipelineBuilder};
pub use stage::{FnStage, Next, Stage};
pub use stages::{
    Codec, JsonCodec, NotFoundStage, SerializationStage, StorageStage, TelemetryStage,
};
