//! Document keys and storage namespaces.
//!
//! Both are opaque strings. The only rule Docket enforces is that they are
//! non-empty; their structure is never inspected.

use crate::error::{DocketError, DocketResult};
use std::fmt;

/// Key that uniquely identifies a document within a [`Namespace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Creates a key, rejecting the empty string.
    ///
    /// # Example
    ///
    /// ```
    /// use docket_core::DocumentKey;
    ///
    /// assert!(DocumentKey::new("m1").is_ok());
    /// assert!(DocumentKey::new("").is_err());
    /// ```
    pub fn new(key: impl Into<String>) -> DocketResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(DocketError::invalid_argument("key", "key must not be empty"));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Storage namespace (a container identifier) a collection is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace, rejecting the empty string.
    pub fn new(namespace: impl Into<String>) -> DocketResult<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(DocketError::invalid_argument(
                "namespace",
                "namespace must not be empty",
            ));
        }
        Ok(Self(namespace))
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_key_rejected() {
        let error = DocumentKey::new("").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert_eq!(error.parameter(), Some("key"));
    }

    #[test]
    fn test_key_is_opaque() {
        let key = DocumentKey::new("../a/b c?").unwrap();
        assert_eq!(key.as_str(), "../a/b c?");
        assert_eq!(key.to_string(), "../a/b c?");
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let error = Namespace::new(String::new()).unwrap_err();
        assert_eq!(error.parameter(), Some("namespace"));
    }

    #[test]
    fn test_namespace_display() {
        let namespace = Namespace::new("httpmonitors").unwrap();
        assert_eq!(namespace.as_ref(), "httpmonitors");
        assert_eq!(format!("{namespace}"), "httpmonitors");
    }
}
