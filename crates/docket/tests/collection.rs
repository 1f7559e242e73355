//! Collection behaviour over complete pipelines.

use docket::assemble::collection_from_config;
use docket::config::{DocketConfig, StorageBackend};
use docket::storage::{FsStorage, MemoryStorage};
use docket::{DocumentCollection, ErrorKind, Namespace, Pipeline};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Monitor {
    url: String,
}

fn monitor(url: &str) -> Monitor {
    Monitor {
        url: url.to_string(),
    }
}

fn standard_pipeline(storage: Arc<MemoryStorage>) -> Arc<Pipeline> {
    let pipeline = Pipeline::builder()
        .use_not_found()
        .use_json()
        .use_storage(storage)
        .build()
        .unwrap();
    Arc::new(pipeline)
}

fn collection_over(storage: Arc<MemoryStorage>) -> DocumentCollection {
    DocumentCollection::new(
        Namespace::new("httpmonitors").unwrap(),
        standard_pipeline(storage),
    )
}

#[tokio::test]
async fn test_example_scenario() {
    let monitors = collection_over(Arc::new(MemoryStorage::new()));

    monitors.put("m1", &monitor("https://example.com")).await.unwrap();
    let read: Option<Monitor> = monitors.get("m1").await.unwrap();
    assert_eq!(read, Some(monitor("https://example.com")));

    monitors.put("m1", &monitor("http://foo-bar.com/")).await.unwrap();
    let read: Option<Monitor> = monitors.get("m1").await.unwrap();
    assert_eq!(read.unwrap().url, "http://foo-bar.com/");

    monitors.delete("m1").await.unwrap();
    let read: Option<Monitor> = monitors.get("m1").await.unwrap();
    assert_eq!(read, None);

    monitors.delete("m1").await.unwrap();
}

#[tokio::test]
async fn test_absent_document_is_none() {
    let monitors = collection_over(Arc::new(MemoryStorage::new()));
    let read: Option<Monitor> = monitors.get("never-written").await.unwrap();
    assert!(read.is_none());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let storage = Arc::new(MemoryStorage::new());
    let monitors = collection_over(storage.clone());

    monitors.delete("never-written").await.unwrap();

    monitors.put("m1", &monitor("https://example.com")).await.unwrap();
    monitors.delete("m1").await.unwrap();
    monitors.delete("m1").await.unwrap();

    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_null_value_is_rejected_without_backend_write() {
    let storage = Arc::new(MemoryStorage::new());
    let monitors = collection_over(storage.clone());

    let error = monitors.put("m1", &Option::<Monitor>::None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    assert_eq!(error.parameter(), Some("value"));
    assert_eq!(storage.writes(), 0);
    assert_eq!(storage.reads(), 0);
}

#[tokio::test]
async fn test_absence_without_suppression_is_an_error() {
    let pipeline = Pipeline::builder()
        .use_json()
        .use_storage(Arc::new(MemoryStorage::new()))
        .build()
        .unwrap();
    let monitors =
        DocumentCollection::new(Namespace::new("httpmonitors").unwrap(), Arc::new(pipeline));

    let error = monitors.get::<Monitor>("m1").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);

    let error = monitors.delete("m1").await.unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_concurrent_writers_share_one_pipeline() {
    let storage = Arc::new(MemoryStorage::new());
    let monitors = collection_over(storage.clone());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let monitors = monitors.clone();
            tokio::spawn(async move {
                let key = format!("m{i}");
                monitors.put(&key, &monitor(&format!("https://{i}.example.com"))).await?;
                monitors.get::<Monitor>(&key).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let read = handle.await.unwrap().unwrap();
        assert_eq!(read, Some(monitor(&format!("https://{i}.example.com"))));
    }
    assert_eq!(storage.len(), 16);
}

#[tokio::test]
async fn test_filesystem_backed_collection_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DocketConfig::default();
    config.storage.backend = StorageBackend::Filesystem;
    config.storage.root = Some(dir.path().to_path_buf());
    config.storage.namespace = "httpmonitors".to_string();

    let monitors = collection_from_config(&config).unwrap();
    monitors.put("m1", &monitor("https://example.com")).await.unwrap();

    let path = FsStorage::new(dir.path()).path_for(
        monitors.namespace(),
        &docket::DocumentKey::new("m1").unwrap(),
    );
    let on_disk: Monitor = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(on_disk, monitor("https://example.com"));

    // A second collection over the same root sees the document.
    let reopened = collection_from_config(&config).unwrap();
    assert_eq!(
        reopened.get::<Monitor>("m1").await.unwrap(),
        Some(monitor("https://example.com"))
    );

    reopened.delete("m1").await.unwrap();
    reopened.delete("m1").await.unwrap();
    assert_eq!(monitors.get::<Monitor>("m1").await.unwrap(), None);
}

type Document = (BTreeMap<String, i64>, Vec<String>, Vec<f64>);

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_put_then_get_round_trips(
        key in "[a-zA-Z0-9/._ -]{1,24}",
        fields in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8),
        tags in proptest::collection::vec(".*", 0..4),
        readings in proptest::collection::vec(
            any::<f64>().prop_filter("JSON has no NaN or infinity", |v| v.is_finite()),
            0..8,
        ),
    ) {
        let monitors = collection_over(Arc::new(MemoryStorage::new()));
        let document = (fields, tags, readings);

        let read: Option<Document> = runtime().block_on(async {
            monitors.put(&key, &document).await.unwrap();
            monitors.get(&key).await.unwrap()
        });

        prop_assert_eq!(read, Some(document));
    }

    #[test]
    fn test_finite_floats_round_trip_exactly(
        value in any::<f64>().prop_filter("finite", |v| v.is_finite()),
    ) {
        let monitors = collection_over(Arc::new(MemoryStorage::new()));

        let read: Option<f64> = runtime().block_on(async {
            monitors.put("reading", &value).await.unwrap();
            monitors.get("reading").await.unwrap()
        });

        prop_assert_eq!(read, Some(value));
    }

    #[test]
    fn test_overwrite_returns_latest(first in any::<i64>(), second in any::<i64>()) {
        let monitors = collection_over(Arc::new(MemoryStorage::new()));

        let read: Option<i64> = runtime().block_on(async {
            monitors.put("k", &first).await.unwrap();
            monitors.put("k", &second).await.unwrap();
            monitors.get("k").await.unwrap()
        });

        prop_assert_eq!(read, Some(second));
    }
}
