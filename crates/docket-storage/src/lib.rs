//! # Docket Storage
//!
//! Blob storage clients for the Docket document pipeline.
//!
//! The pipeline's terminal stage only needs a narrow contract from the
//! physical store: read bytes by key, write bytes by key, delete by key. That
//! contract is the [`StorageClient`] trait. Two implementations ship here:
//!
//! | Client          | Backing                                   | Use                       |
//! |-----------------|-------------------------------------------|---------------------------|
//! | [`MemoryStorage`] | `DashMap` keyed by `(namespace, key)`   | Tests, ephemeral services |
//! | [`FsStorage`]     | `<root>/<namespace>/<key>` files         | Single-node persistence   |
//!
//! Absence is always signalled as [`StorageError::NotFound`] so upstream
//! stages can tell it apart from real faults.
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use docket_core::{DocumentKey, Namespace};
//! use docket_storage::{MemoryStorage, StorageClient, StorageError};
//!
//! # tokio_test::block_on(async {
//! let storage = MemoryStorage::new();
//! let namespace = Namespace::new("monitors").unwrap();
//! let key = DocumentKey::new("m1").unwrap();
//!
//! storage.write(&namespace, &key, Bytes::from_static(b"{}")).await.unwrap();
//! assert_eq!(storage.read(&namespace, &key).await.unwrap(), Bytes::from_static(b"{}"));
//!
//! storage.delete(&namespace, &key).await.unwrap();
//! assert!(matches!(
//!     storage.read(&namespace, &key).await,
//!     Err(StorageError::NotFound { .. })
//! ));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/docket-storage/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod fs;
pub mod memory;

pub use client::StorageClient;
pub use error::{StorageError, StorageResult};
pub use fs::{FsStorage, MAX_COMPONENT_LEN};
pub use memory::MemoryStorage;
