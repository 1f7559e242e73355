//! # Docket
//!
//! **Typed document persistence over a key/value blob store.**
//!
//! Every get, put and delete runs through a [`Pipeline`] of interchangeable
//! stages. Each stage owns one concern (serialization, not-found handling,
//! telemetry, storage I/O) and none of them knows about the others. The
//! [`DocumentCollection`] on top is the only layer that sees concrete types.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docket::prelude::*;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Monitor { url: String }
//!
//! let monitors = docket::assemble::collection_from_config(&DocketConfig::default())?;
//! monitors.put("m1", &Monitor { url: "https://example.com".into() }).await?;
//! let monitor: Option<Monitor> = monitors.get("m1").await?;
//! monitors.delete("m1").await?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! get/put/delete → [Telemetry] → [NotFound] → Serialization → Storage ─┐
//!                                                                      │
//! Option<T>/()   ← [Telemetry] ← [NotFound] ← Serialization ← Storage ←┘
//! ```

#![doc(html_root_url = "https://docs.rs/docket/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assemble;
mod collection;
mod finite;

pub use collection::DocumentCollection;

// Re-export member crates
pub use docket_config as config;
pub use docket_core as core;
pub use docket_middleware as middleware;
pub use docket_storage as storage;
pub use docket_telemetry as telemetry;

pub use docket_core::{DocketError, DocketResult, DocumentKey, ErrorKind, Namespace};
pub use docket_middleware::Pipeline;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use docket::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assemble::{collection_from_config, pipeline_from_config, storage_from_config};
    pub use crate::DocumentCollection;

    pub use docket_config::{ConfigLoader, DocketConfig};
    pub use docket_core::{DocketError, DocketResult, ErrorKind, Namespace};
    pub use docket_middleware::{Pipeline, PipelineBuilder, Stage};
    pub use docket_storage::{FsStorage, MemoryStorage, StorageClient};

    pub use serde::{Deserialize, Serialize};
}
