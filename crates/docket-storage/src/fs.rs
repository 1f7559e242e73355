//! Filesystem-backed blob store.
//!
//! Documents live at `<root>/<namespace>/<key>`. Namespaces and keys are
//! opaque strings, so each is percent-encoded into a single safe path
//! component, and the components `.` and `..` are escaped entirely. A
//! component whose encoding would exceed [`MAX_COMPONENT_LEN`] is stored
//! under `=` followed by the URL-safe base64 SHA-1 of the raw string.
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a concurrent reader sees either the old or the new document.

use crate::client::StorageClient;
use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use base64::Engine;
use docket_core::{BoxFuture, DocumentKey, Namespace};
use sha1::{Digest, Sha1};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest encoded component stored verbatim, in bytes.
///
/// Leaves room under the common 255-byte name limit for the temp-file
/// prefix and suffix.
pub const MAX_COMPONENT_LEN: usize = 200;

/// A [`StorageClient`] that stores each document as one file.
#[derive(Debug)]
pub struct FsStorage {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl FsStorage {
    /// Creates a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_counter: AtomicU64::new(0),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path a document is stored at.
    #[must_use]
    pub fn path_for(&self, namespace: &Namespace, key: &DocumentKey) -> PathBuf {
        self.root
            .join(&*escape_component(namespace.as_str()))
            .join(&*escape_component(key.as_str()))
    }

    fn temp_path_for(&self, target: &Path) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        // '+' is always percent-encoded, so temp names cannot collide with documents.
        target.with_file_name(format!("+{name}.{}.{n}.tmp", std::process::id()))
    }
}

fn escape_component(raw: &str) -> Cow<'_, str> {
    match raw {
        "." => return Cow::Borrowed("%2E"),
        ".." => return Cow::Borrowed("%2E%2E"),
        _ => {}
    }

    let encoded = urlencoding::encode(raw);
    if encoded.len() <= MAX_COMPONENT_LEN {
        return encoded;
    }

    // '=' is always percent-encoded, so digests cannot collide with encoded names.
    let digest = Sha1::digest(raw.as_bytes());
    Cow::Owned(format!(
        "={}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
    ))
}

fn map_io(error: io::Error, namespace: &Namespace, key: &DocumentKey) -> StorageError {
    if error.kind() == io::ErrorKind::NotFound {
        StorageError::not_found(namespace, key)
    } else {
        StorageError::Io(error)
    }
}

impl StorageClient for FsStorage {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn read<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<Bytes>> {
        Box::pin(async move {
            let path = self.path_for(namespace, key);
            tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|e| map_io(e, namespace, key))
        })
    }

    fn write<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
        bytes: Bytes,
    ) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let path = self.path_for(namespace, key);
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }

            let temp = self.temp_path_for(&path);
            if let Err(e) = tokio::fs::write(&temp, &bytes).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(StorageError::Io(e));
            }
            if let Err(e) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(StorageError::Io(e));
            }

            tracing::trace!(path = %path.display(), len = bytes.len(), "filesystem write");
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a DocumentKey,
    ) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            let path = self.path_for(namespace, key);
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| map_io(e, namespace, key))
        })
    }
}
