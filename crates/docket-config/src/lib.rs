//! Typed configuration for Docket.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`PREFIX__SECTION__KEY`)
//! - Strict parsing (unknown fields are rejected)
//! - Layered loading (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use docket_config::ConfigLoader;
//!
//! # fn main() -> Result<(), docket_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("docket.toml")?
//!     .with_env_prefix("DOCKET")
//!     .load()?;
//!
//! println!("documents live in namespace {}", config.storage.namespace);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [storage]
//! backend = "filesystem"   # or "memory"
//! root = "/var/lib/docket"
//! namespace = "httpmonitors"
//!
//! [pipeline]
//! suppress_not_found = true
//! pretty_json = false
//! telemetry = true
//!
//! [logging]
//! level = "info"
//! format = "json"          # or "pretty"
//!
//! [metrics]
//! enabled = true           # requires pipeline.telemetry
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `DOCKET__STORAGE__BACKEND=filesystem`
//! - `DOCKET__STORAGE__ROOT=/data/docket`
//! - `DOCKET__PIPELINE__PRETTY_JSON=true`
//! - `DOCKET__LOGGING__LEVEL=debug`
//! - `DOCKET__METRICS__ENABLED=true`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{DocketConfig, DocketConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    LogFormat, LoggingConfig, MetricsConfig, PipelineConfig, StorageBackend, StorageConfig,
};
