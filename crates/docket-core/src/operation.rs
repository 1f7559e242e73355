//! Operation envelopes that flow through the pipeline.
//!
//! An [`OperationRequest`] travels down the chain from the first registered
//! stage to the terminal storage stage; an [`OperationResult`] travels back
//! up. Neither knows the caller's concrete document type: payloads are either
//! raw bytes (below the serialization stage) or a structured
//! [`serde_json::Value`] (above it).

use crate::key::{DocumentKey, Namespace};
use bytes::Bytes;
use serde_json::Value;
use std::fmt;

/// The kind of document operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read a document.
    Get,
    /// Create or overwrite a document.
    Put,
    /// Remove a document.
    Delete,
}

impl OperationKind {
    /// Returns the lowercase name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document payload at some layer of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Encoded bytes, as stored by the backend.
    Bytes(Bytes),
    /// A structured value, as seen by the collection.
    Value(Value),
}

/// Immutable request envelope for one document operation.
///
/// Stages that need to change the payload consume the request and build a
/// new one with [`with_payload`](Self::with_payload).
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    namespace: Namespace,
    key: DocumentKey,
    kind: OperationKind,
    payload: Option<Payload>,
}

impl OperationRequest {
    /// Creates a `Get` request.
    #[must_use]
    pub fn get(namespace: Namespace, key: DocumentKey) -> Self {
        Self {
            namespace,
            key,
            kind: OperationKind::Get,
            payload: None,
        }
    }

    /// Creates a `Put` request carrying a payload.
    #[must_use]
    pub fn put(namespace: Namespace, key: DocumentKey, payload: Payload) -> Self {
        Self {
            namespace,
            key,
            kind: OperationKind::Put,
            payload: Some(payload),
        }
    }

    /// Creates a `Delete` request.
    #[must_use]
    pub fn delete(namespace: Namespace, key: DocumentKey) -> Self {
        Self {
            namespace,
            key,
            kind: OperationKind::Delete,
            payload: None,
        }
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the document key.
    #[must_use]
    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Returns a copy of this request carrying a different payload.
    #[must_use]
    pub fn with_payload(self, payload: Payload) -> Self {
        Self {
            payload: Some(payload),
            ..self
        }
    }

    /// Splits the request, taking ownership of its payload.
    #[must_use]
    pub fn take_payload(self) -> (Self, Option<Payload>) {
        let Self {
            namespace,
            key,
            kind,
            payload,
        } = self;
        (
            Self {
                namespace,
                key,
                kind,
                payload: None,
            },
            payload,
        )
    }
}

/// Outcome of one document operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// `Get` found a document.
    Found(Payload),
    /// `Get` found no document under the key. Not an error.
    NotFound,
    /// `Put` or `Delete` completed.
    Done,
}

impl OperationResult {
    /// Returns a short label for logs and metrics.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Done => "done",
        }
    }

    /// Returns the payload of a `Found` result.
    #[must_use]
    pub fn into_payload(self) -> Option<Payload> {
        match self {
            Self::Found(payload) => Some(payload),
            Self::NotFound | Self::Done => None,
        }
    }
}
