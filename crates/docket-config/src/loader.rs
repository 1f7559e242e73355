//! Layered configuration loader.
//!
//! Layers apply in call order, later layers overriding earlier ones:
//! 1. Defaults or a preset
//! 2. A configuration file or string (TOML or JSON)
//! 3. Environment variables (`PREFIX__SECTION__KEY`), applied at `load()`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ConfigError, DocketConfig, LogFormat, StorageBackend};

/// Configuration loader with a layered approach.
///
/// # Example
///
/// ```no_run
/// use docket_config::ConfigLoader;
///
/// # fn main() -> Result<(), docket_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("docket.toml")?
///     .with_env_prefix("DOCKET")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DocketConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DocketConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = DocketConfig::default();
        self
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = DocketConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = DocketConfig::production();
        self
    }

    /// Loads a configuration file. The format comes from the extension
    /// (`.toml` or `.json`).
    ///
    /// Sections present in the file replace the current ones; sections and
    /// fields it omits take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read,
    /// does not parse, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");

        Ok(self)
    }

    /// Loads a configuration file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in `format` (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unsupported or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use docket_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[storage]\nnamespace = \"httpmonitors\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.storage.namespace, "httpmonitors");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        Ok(self)
    }

    /// Enables environment overrides of the form `PREFIX__SECTION__KEY`,
    /// for example `DOCKET__STORAGE__BACKEND=filesystem`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file from the working directory (or a parent) into the
    /// process environment. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if a `.env` file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "loaded .env file");
                Ok(self)
            }
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e.to_string())),
        }
    }

    /// Applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value does not parse or the
    /// final configuration is invalid.
    pub fn load(mut self) -> Result<DocketConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> DocketConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<DocketConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let scoped = format!("{prefix}__");
        let mut vars: Vec<(String, String)> = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .filter(|(k, _)| k.starts_with(&scoped))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["STORAGE", "BACKEND"] => {
                self.config.storage.backend = match value.to_lowercase().as_str() {
                    "memory" => StorageBackend::Memory,
                    "filesystem" => StorageBackend::Filesystem,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'memory' or 'filesystem'",
                        ))
                    }
                };
            }
            ["STORAGE", "ROOT"] => {
                self.config.storage.root = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            ["STORAGE", "NAMESPACE"] => {
                self.config.storage.namespace = value.to_string();
            }

            ["PIPELINE", "SUPPRESS_NOT_FOUND"] => {
                self.config.pipeline.suppress_not_found = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["PIPELINE", "PRETTY_JSON"] => {
                self.config.pipeline.pretty_json = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["PIPELINE", "TELEMETRY"] => {
                self.config.pipeline.telemetry = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }

            ["METRICS", "ENABLED"] => {
                self.config.metrics.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            _ => {
                tracing::warn!(var = key, "ignoring unrecognized configuration variable");
            }
        }

        Ok(())
    }
}

/// Parses a boolean from an environment value.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, DocketConfig::default());
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [storage]
            backend = "filesystem"
            root = "/var/lib/docket"
            namespace = "httpmonitors"

            [pipeline]
            suppress_not_found = false
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Filesystem);
        assert_eq!(config.storage.root, Some(PathBuf::from("/var/lib/docket")));
        assert_eq!(config.storage.namespace, "httpmonitors");
        assert!(!config.pipeline.suppress_not_found);
        assert!(config.pipeline.telemetry);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"logging": {"level": "warn", "format": "pretty"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let err = ConfigLoader::new().with_string("a: 1", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_loader_rejects_unknown_field() {
        let err = ConfigLoader::new()
            .with_string("[pipeline]\nretries = 3\n", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new()
            .with_string("[storage]\nbackend = \"filesystem\"\n", "toml")
            .unwrap()
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("storage.root"));
    }

    #[test]
    fn test_load_unvalidated_skips_validation() {
        let config = ConfigLoader::new()
            .with_string("[storage]\nbackend = \"filesystem\"\n", "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.storage.backend, StorageBackend::Filesystem);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/docket.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/docket.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, DocketConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        for value in ["true", "True", "1", "yes", "on"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["false", "FALSE", "0", "no", "off"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_apply_env_var_storage() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__STORAGE__BACKEND", "Filesystem", "TEST").unwrap();
        loader.apply_env_var("TEST__STORAGE__ROOT", "/srv/docket", "TEST").unwrap();
        loader.apply_env_var("TEST__STORAGE__NAMESPACE", "checks", "TEST").unwrap();

        assert_eq!(loader.config.storage.backend, StorageBackend::Filesystem);
        assert_eq!(loader.config.storage.root, Some(PathBuf::from("/srv/docket")));
        assert_eq!(loader.config.storage.namespace, "checks");

        loader.apply_env_var("TEST__STORAGE__ROOT", "", "TEST").unwrap();
        assert_eq!(loader.config.storage.root, None);
    }

    #[test]
    fn test_apply_env_var_pipeline() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__PIPELINE__SUPPRESS_NOT_FOUND", "off", "TEST").unwrap();
        loader.apply_env_var("TEST__PIPELINE__PRETTY_JSON", "yes", "TEST").unwrap();
        loader.apply_env_var("TEST__PIPELINE__TELEMETRY", "0", "TEST").unwrap();

        assert!(!loader.config.pipeline.suppress_not_found);
        assert!(loader.config.pipeline.pretty_json);
        assert!(!loader.config.pipeline.telemetry);
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "debug", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();

        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_apply_env_var_metrics() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__METRICS__ENABLED", "true", "TEST").unwrap();
        assert!(loader.config.metrics.enabled);
        assert!(loader.apply_env_var("TEST__METRICS__ENABLED", "on-ish", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__PIPELINE__TELEMETRY", "maybe", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__STORAGE__BACKEND", "s3", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__STORAGE__BUCKET", "x", "TEST").unwrap();
        assert_eq!(loader.config, DocketConfig::default());
    }
}
