//! Error types for Docket.
//!
//! This module provides [`DocketError`], the single error type that crosses
//! every stage boundary in the pipeline, and [`ErrorKind`], its flat
//! classification used for log fields and metric labels.
//!
//! # Propagation
//!
//! | `ErrorKind`        | Raised by                 | Surfaced to collection callers |
//! |--------------------|---------------------------|--------------------------------|
//! | `NotFound`         | Storage stage             | Only when no not-found stage is registered, or on `put` |
//! | `Serialization`    | Serialization stage, collection | Always                   |
//! | `InvalidArgument`  | Collection, storage stage | Always                         |
//! | `Backend`          | Storage stage             | Always                         |
//! | `Configuration`    | Pipeline builder, stages  | Always                         |
//!
//! Only `NotFound` is ever downgraded to a non-error outcome, and only for
//! `Get` and `Delete`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`DocketError`].
pub type DocketResult<T> = Result<T, DocketError>;

/// Classification of a [`DocketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The key is absent at the storage layer.
    NotFound,
    /// A payload could not be encoded or decoded.
    Serialization,
    /// The caller supplied an invalid argument.
    InvalidArgument,
    /// Any other storage-layer fault.
    Backend,
    /// The pipeline or its wiring is misconfigured.
    Configuration,
}

impl ErrorKind {
    /// Returns the `snake_case` name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Serialization => "serialization",
            Self::InvalidArgument => "invalid_argument",
            Self::Backend => "backend",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard error type for Docket.
///
/// # Example
///
/// ```
/// use docket_core::{DocketError, ErrorKind};
///
/// let error = DocketError::invalid_argument("value", "value must not be null");
/// assert_eq!(error.kind(), ErrorKind::InvalidArgument);
/// assert!(error.to_string().contains("value"));
/// ```
#[derive(Error, Debug)]
pub enum DocketError {
    /// No document is stored under the key.
    #[error("Not found: '{key}' in namespace '{namespace}'")]
    NotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Key that was not found.
        key: String,
    },

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying codec error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The caller supplied an invalid argument.
    #[error("Invalid argument '{parameter}': {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable error message.
        message: String,
    },

    /// The storage backend failed.
    #[error("Backend error: {message}")]
    Backend {
        /// Human-readable error message.
        message: String,
        /// The underlying storage error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The pipeline or its wiring is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },
}

impl DocketError {
    /// Creates a not-found error for a namespace/key pair.
    #[must_use]
    pub fn not_found(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a serialization error with a source error.
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an invalid-argument error naming the offending parameter.
    #[must_use]
    pub fn invalid_argument(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter,
            message: message.into(),
        }
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a backend error with a source error.
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Backend { .. } => ErrorKind::Backend,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Returns true if this is the not-found kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the offending parameter for invalid-argument errors.
    #[must_use]
    pub const fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_error() {
        let error = DocketError::not_found("monitors", "m1");
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "Not found: 'm1' in namespace 'monitors'"
        );
    }

    #[test]
    fn test_invalid_argument_names_parameter() {
        let error = DocketError::invalid_argument("value", "must not be null");
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.parameter(), Some("value"));
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DocketError::backend_with_source("write failed", io);
        assert_eq!(error.kind(), ErrorKind::Backend);
        assert!(error.source().is_some());
        assert_eq!(error.parameter(), None);
    }

    #[test]
    fn test_serialization_error_without_source() {
        let error = DocketError::serialization("bad payload");
        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert!(error.source().is_none());
        assert_eq!(error.to_string(), "Serialization error: bad payload");
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::InvalidArgument.to_string(), "invalid_argument");

        let json = serde_json::to_string(&ErrorKind::Configuration).unwrap();
        assert_eq!(json, "\"configuration\"");
    }
}
