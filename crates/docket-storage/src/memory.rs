//! In-memory blob store.

use crate::client::StorageClient;
use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use dashmap::DashMap;
use docket_core::{BoxFuture, DocumentKey, Namespace};
use std::sync::atomic::{AtomicU64, Ordering};

/// A [`StorageClient`] that keeps every document in a concurrent map.
///
/// Besides storage, it counts the operations it served so tests can assert
/// that a call did (or did not) reach the backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: DashMap<(Namespace, DocumentKey), Bytes>,
    reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns true if a document is stored under `key`.
    #[must_use]
    pub fn contains(&self, namespace: &Namespace, key: &DocumentKey) -> bool {
        self.documents.contains_key(&(namespace.clone(), key.clone()))
    }

    /// Number of `read` calls served.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of `write` calls served.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of `delete` calls served.
    #[must_use]
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }
}

impl StorageClient for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<Bytes>> {
        Box::pin(async move {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.documents
                .get(&(namespace.clone(), key.clone()))
                .map(|entry| entry.value().clone())
                .ok_or_else(|| StorageError::not_found(namespace, key))
        })
    }

    fn write<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
        bytes: Bytes,
    ) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.writes.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(%namespace, %key, len = bytes.len(), "memory write");
            self.documents.insert((namespace.clone(), key.clone()), bytes);
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.deletes.fetch_add(1, Ordering::Relaxed);
            self.documents
                .remove(&(namespace.clone(), key.clone()))
                .map(|_| ())
                .ok_or_else(|| StorageError::not_found(namespace, key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(name: &str) -> Namespace {
        Namespace::new(name).unwrap()
    }

    fn key(name: &str) -> DocumentKey {
        DocumentKey::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let error = storage.read(&ns("a"), &key("k")).await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(storage.reads(), 1);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let storage = MemoryStorage::new();
        let (namespace, key) = (ns("a"), key("k"));

        storage.write(&namespace, &key, Bytes::from_static(b"1")).await.unwrap();
        storage.write(&namespace, &key, Bytes::from_static(b"2")).await.unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.writes(), 2);
        assert_eq!(
            storage.read(&namespace, &key).await.unwrap(),
            Bytes::from_static(b"2")
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let storage = MemoryStorage::new();
        storage
            .write(&ns("a"), &key("k"), Bytes::from_static(b"a"))
            .await
            .unwrap();

        assert!(storage.contains(&ns("a"), &key("k")));
        assert!(!storage.contains(&ns("b"), &key("k")));
        assert!(storage.read(&ns("b"), &key("k")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let error = storage.delete(&ns("a"), &key("k")).await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(storage.deletes(), 1);
        assert!(storage.is_empty());
    }
}
