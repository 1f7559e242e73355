//! Top-level configuration type.

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, LogFormat, LoggingConfig, MetricsConfig, PipelineConfig, StorageBackend,
    StorageConfig,
};

/// Complete Docket configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use docket_config::{DocketConfig, StorageBackend};
///
/// let config = DocketConfig::default();
/// assert_eq!(config.storage.backend, StorageBackend::Memory);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DocketConfig {
    /// Blob store selection.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Stage composition.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Prometheus metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl DocketConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> DocketConfigBuilder {
        DocketConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `storage.namespace` is empty
    /// - the filesystem backend has no `storage.root`
    /// - `logging.level` is empty
    /// - `metrics.enabled` is set without `pipeline.telemetry`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "storage.namespace",
                "must not be empty",
            ));
        }

        if self.storage.backend == StorageBackend::Filesystem {
            match &self.storage.root {
                None => {
                    return Err(ConfigError::invalid_value(
                        "storage.root",
                        "required when storage.backend is 'filesystem'",
                    ))
                }
                Some(root) if root.as_os_str().is_empty() => {
                    return Err(ConfigError::invalid_value(
                        "storage.root",
                        "must not be empty",
                    ))
                }
                Some(_) => {}
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        if self.metrics.enabled && !self.pipeline.telemetry {
            return Err(ConfigError::invalid_value(
                "metrics.enabled",
                "requires pipeline.telemetry",
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs, indented JSON documents.
    ///
    /// ```
    /// use docket_config::{DocketConfig, LogFormat};
    ///
    /// let config = DocketConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.pipeline.pretty_json = true;
        config
    }

    /// Production preset: JSON info logs, compact documents, metrics.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.pipeline.pretty_json = false;
        config.pipeline.telemetry = true;
        config.metrics.enabled = true;
        config
    }
}

/// Builder for [`DocketConfig`].
#[derive(Debug, Default)]
pub struct DocketConfigBuilder {
    storage: Option<StorageConfig>,
    pipeline: Option<PipelineConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsConfig>,
}

impl DocketConfigBuilder {
    /// Sets the storage section.
    #[must_use]
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the pipeline section.
    #[must_use]
    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Sets the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> DocketConfig {
        DocketConfig {
            storage: self.storage.unwrap_or_default(),
            pipeline: self.pipeline.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<DocketConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
