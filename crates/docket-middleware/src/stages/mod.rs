//! Built-in pipeline stages.
//!
//! - [`not_found`] - Normalise "key absent" into caller-friendly outcomes
//! - [`serialization`] - Structured value ↔ byte payload
//! - [`telemetry`] - Per-operation logs and metrics
//! - [`storage`] - Terminal backend I/O
//!
//! A typical pipeline registers them in that order, but only the storage
//! stage's position is fixed: it must be last.

pub mod not_found;
pub mod serialization;
pub mod storage;
pub mod telemetry;

// Re-export main types
pub use not_found::NotFoundStage;
pub use serialization::{Codec, JsonCodec, SerializationStage};
pub use storage::StorageStage;
pub use telemetry::TelemetryStage;
