//! Configuration schema types.
//!
//! This module defines the structure of every configuration section.

use docket_telemetry::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which blob store backs the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local in-memory store. Contents are lost on exit.
    #[default]
    Memory,
    /// One file per document under a root directory.
    Filesystem,
}

impl StorageBackend {
    /// Returns the backend name as written in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Filesystem => "filesystem",
        }
    }
}

/// Storage configuration section.
///
/// # Example
///
/// ```
/// use docket_config::{StorageBackend, StorageConfig};
///
/// let config = StorageConfig {
///     backend: StorageBackend::Filesystem,
///     root: Some("/var/lib/docket".into()),
///     namespace: "httpmonitors".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend kind.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory. Required for the filesystem backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Namespace the default collection is bound to.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: None,
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    "documents".to_string()
}

/// Pipeline composition section.
///
/// The storage stage is always present and always last; these switches
/// control which stages are registered in front of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Register the not-found stage so missing documents read as `None`
    /// and deletes of missing documents succeed.
    #[serde(default = "default_true")]
    pub suppress_not_found: bool,

    /// Store indented JSON instead of compact JSON.
    #[serde(default)]
    pub pretty_json: bool,

    /// Register the telemetry stage as the outermost stage.
    #[serde(default = "default_true")]
    pub telemetry: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            suppress_not_found: true,
            pretty_json: false,
            telemetry: true,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error, or `EnvFilter` syntax).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the subscriber settings used by
    /// [`docket_telemetry::init_logging`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            level: self.level.clone(),
            ..base
        }
    }
}

/// Metrics section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder when a collection is assembled.
    /// Recording happens in the telemetry stage, which must be enabled.
    #[serde(default)]
    pub enabled: bool,
}

impl MetricsConfig {
    /// Converts this section into the settings used by
    /// [`docket_telemetry::init_metrics`].
    #[must_use]
    pub fn to_metrics_config(&self) -> docket_telemetry::MetricsConfig {
        docket_telemetry::MetricsConfig {
            enabled: self.enabled,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
