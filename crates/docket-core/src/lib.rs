//! # Docket Core
//!
//! Core types shared by every layer of the Docket document pipeline.
//!
//! This crate provides the foundational types used throughout Docket:
//!
//! - [`OperationRequest`] - Immutable request envelope (namespace, key, kind, payload)
//! - [`OperationResult`] - Tagged outcome (`Found`, `NotFound`, `Done`)
//! - [`Payload`] - Raw bytes below serialization, structured value above it
//! - [`DocumentKey`] / [`Namespace`] - Validated, opaque identifiers
//! - [`DocketError`] - Standard error taxonomy
//!
//! ## Example
//!
//! ```
//! use docket_core::{DocumentKey, Namespace, OperationKind, OperationRequest};
//!
//! let namespace = Namespace::new("monitors").unwrap();
//! let key = DocumentKey::new("m1").unwrap();
//! let request = OperationRequest::get(namespace, key);
//!
//! assert_eq!(request.kind(), OperationKind::Get);
//! assert!(request.payload().is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/docket-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod operation;

use std::future::Future;
use std::pin::Pin;

pub use error::{DocketError, DocketResult, ErrorKind};
pub use key::{DocumentKey, Namespace};
pub use operation::{OperationKind, OperationRequest, OperationResult, Payload};

/// A boxed, sendable future.
///
/// Used for every asynchronous seam in Docket (stages and storage clients)
/// so the traits stay object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
