//! The storage client contract.

use crate::error::StorageResult;
use bytes::Bytes;
use docket_core::{BoxFuture, DocumentKey, Namespace};

/// A key/value blob store addressed by `(namespace, key)`.
///
/// Implementations must be safe to share across tasks. Connection pooling,
/// timeouts and retries, if any, belong to the implementation; the pipeline
/// never retries.
///
/// # Contract
///
/// | Method   | Present key          | Absent key                    |
/// |----------|----------------------|-------------------------------|
/// | `read`   | `Ok(bytes)`          | `Err(StorageError::NotFound)` |
/// | `write`  | overwrite, `Ok(())`  | create, `Ok(())`              |
/// | `delete` | remove, `Ok(())`     | `Err(StorageError::NotFound)` |
pub trait StorageClient: Send + Sync + 'static {
    /// Returns a short name for logs.
    fn name(&self) -> &'static str;

    /// Reads the bytes stored under `key`.
    fn read<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<Bytes>>;

    /// Writes `bytes` under `key`, replacing any existing value.
    fn write<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
        bytes: Bytes,
    ) -> BoxFuture<'a, StorageResult<()>>;

    /// Removes the value stored under `key`.
    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<()>>;
}
