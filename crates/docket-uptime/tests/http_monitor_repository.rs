//! Repository tests over the standard pipeline:
//! not-found suppression → JSON → storage.

use chrono::{Duration, Utc};
use docket::storage::MemoryStorage;
use docket::{DocumentCollection, Namespace, Pipeline};
use docket_uptime::{
    HttpMonitor, HttpMonitorCheckResult, HttpMonitorCheckResultRepository, HttpMonitorId,
    HttpMonitorRepository, HTTP_MONITORS,
};
use std::sync::Arc;

struct Fixture {
    storage: Arc<MemoryStorage>,
    monitors: HttpMonitorRepository,
    results: HttpMonitorCheckResultRepository,
}

fn fixture() -> Fixture {
    let storage = Arc::new(MemoryStorage::new());
    let pipeline = Pipeline::builder()
        .use_not_found()
        .use_json()
        .use_storage(storage.clone())
        .build()
        .unwrap();
    let pipeline = Arc::new(pipeline);

    Fixture {
        storage,
        monitors: HttpMonitorRepository::from_pipeline(pipeline.clone()).unwrap(),
        results: HttpMonitorCheckResultRepository::from_pipeline(pipeline).unwrap(),
    }
}

fn generate_monitor() -> HttpMonitor {
    HttpMonitor::new(HttpMonitorId::create(), "https://example.com").unwrap()
}

async fn generate_and_persist(repository: &HttpMonitorRepository) -> HttpMonitor {
    let monitor = generate_monitor();
    repository.put(&monitor).await.unwrap();
    monitor
}

#[tokio::test]
async fn test_get_returns_entity() {
    let f = fixture();
    let existing = generate_and_persist(&f.monitors).await;

    let entity = f.monitors.get(&existing.id).await.unwrap().unwrap();

    assert_eq!(entity.id, existing.id);
    assert_eq!(entity, existing);
}

#[tokio::test]
async fn test_get_returns_none_when_not_found() {
    let f = fixture();

    let entity = f.monitors.get(&HttpMonitorId::create()).await.unwrap();

    assert!(entity.is_none());
}

#[tokio::test]
async fn test_put_creates_entity() {
    let f = fixture();
    let entity = generate_monitor();

    f.monitors.put(&entity).await.unwrap();

    let read = f.monitors.get(&entity.id).await.unwrap().unwrap();
    assert_eq!(read.id, entity.id);
    assert_eq!(f.storage.writes(), 1);
}

#[tokio::test]
async fn test_put_updates_entity() {
    let f = fixture();
    let mut entity = generate_and_persist(&f.monitors).await;
    entity.url = "http://foo-bar.com/".parse().unwrap();

    f.monitors.put(&entity).await.unwrap();

    let read = f.monitors.get(&entity.id).await.unwrap().unwrap();
    assert_eq!(read.url.to_string(), "http://foo-bar.com/");
    assert_eq!(f.storage.len(), 1);
}

#[tokio::test]
async fn test_delete_removes_entity_when_found() {
    let f = fixture();
    let entity = generate_and_persist(&f.monitors).await;

    f.monitors.delete(&entity.id).await.unwrap();

    assert!(f.monitors.get(&entity.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_does_not_fail_when_not_found() {
    let f = fixture();

    f.monitors.delete(&HttpMonitorId::create()).await.unwrap();
}

#[tokio::test]
async fn test_repository_over_existing_collection_uses_its_namespace() {
    let f = fixture();
    let entity = generate_and_persist(&f.monitors).await;

    let pipeline = Pipeline::builder()
        .use_not_found()
        .use_json()
        .use_storage(f.storage.clone())
        .build()
        .unwrap();
    let same = HttpMonitorRepository::new(DocumentCollection::new(
        Namespace::new(HTTP_MONITORS).unwrap(),
        Arc::new(pipeline),
    ));

    assert_eq!(same.get(&entity.id).await.unwrap(), Some(entity));
}

#[tokio::test]
async fn test_check_results_keep_only_the_latest() {
    let f = fixture();
    let monitor = generate_and_persist(&f.monitors).await;
    let earlier = HttpMonitorCheckResult {
        http_monitor_id: monitor.id,
        http_status_code: 503,
        created: Utc::now() - Duration::minutes(5),
    };
    let later = HttpMonitorCheckResult::now(monitor.id, 200);

    assert!(f.results.latest(&monitor.id).await.unwrap().is_none());

    f.results.record(&earlier).await.unwrap();
    f.results.record(&later).await.unwrap();

    let latest = f.results.latest(&monitor.id).await.unwrap().unwrap();
    assert_eq!(latest, later);
    assert!(latest.is_success());

    // Monitors and results live in separate namespaces under the same key.
    assert_eq!(f.storage.len(), 2);

    f.results.clear(&monitor.id).await.unwrap();
    f.results.clear(&monitor.id).await.unwrap();
    assert!(f.results.latest(&monitor.id).await.unwrap().is_none());
    assert!(f.monitors.get(&monitor.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_stored_document_with_nil_id_is_a_serialization_error() {
    let f = fixture();
    let id = HttpMonitorId::create();

    // Write a document whose id field is nil under a valid key.
    let raw = DocumentCollection::new(
        Namespace::new(HTTP_MONITORS).unwrap(),
        Arc::new(
            Pipeline::builder()
                .use_json()
                .use_storage(f.storage.clone())
                .build()
                .unwrap(),
        ),
    );
    raw.put(
        &id.to_string(),
        &serde_json::json!({"id": "00000000-0000-0000-0000-000000000000", "url": "x"}),
    )
    .await
    .unwrap();

    let error = f.monitors.get(&id).await.unwrap_err();
    assert_eq!(error.kind(), docket::ErrorKind::Serialization);
}
