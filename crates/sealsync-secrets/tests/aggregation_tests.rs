//! Integration tests for JSON collections over keyed blob stores

mod common;

use common::{EventLog, RecordingStore, COLLECTION};
use sealsync_secrets::{
    AggregationError, AggregationErrorKind, JsonCollection, MemoryBlobStore, StoreError,
};

#[tokio::test]
async fn test_round_trip_on_empty_collection() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, "{}");
    let collection = JsonCollection::new(&store, COLLECTION);

    collection.add_or_update("API_KEY", "abc123").await.unwrap();

    assert_eq!(collection.get("API_KEY").await.unwrap(), "abc123");
    let all = collection.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["API_KEY"], "abc123");
}

#[tokio::test]
async fn test_merge_preserves_unrelated_keys() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, r#"{"A":"1","B":"2"}"#);
    let collection = JsonCollection::new(&store, COLLECTION);

    collection.add_or_update("C", "3").await.unwrap();
    collection.add_or_update("A", "updated").await.unwrap();

    let all = collection.get_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["A"], "updated");
    assert_eq!(all["B"], "2");
    assert_eq!(all["C"], "3");
}

#[tokio::test]
async fn test_identical_update_is_idempotent() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, r#"{"B":"2"}"#);
    let collection = JsonCollection::new(&store, COLLECTION);

    collection.add_or_update("A", "1").await.unwrap();
    let first = store.raw(COLLECTION).unwrap();
    collection.add_or_update("A", "1").await.unwrap();
    let second = store.raw(COLLECTION).unwrap();

    assert_eq!(first, second);
    assert_eq!(collection.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_blob_is_sorted_pretty_json() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, "{}");
    let collection = JsonCollection::new(&store, COLLECTION);

    collection.add_or_update("ZETA", "z").await.unwrap();
    collection.add_or_update("ALPHA", "a").await.unwrap();

    assert_eq!(
        store.raw(COLLECTION).unwrap(),
        "{\n  \"ALPHA\": \"a\",\n  \"ZETA\": \"z\"\n}"
    );
}

#[tokio::test]
async fn test_corrupt_blob_rejected_and_left_untouched() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, "not-json");
    let collection = JsonCollection::new(&store, COLLECTION);

    let err = collection.add_or_update("A", "1").await.unwrap_err();
    assert_eq!(err.kind(), AggregationErrorKind::CorruptFormat);

    let err = collection.get_all().await.unwrap_err();
    assert_eq!(err.kind(), AggregationErrorKind::CorruptFormat);

    assert_eq!(store.raw(COLLECTION).as_deref(), Some("not-json"));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_missing_collection_is_never_created() {
    let store = MemoryBlobStore::new();
    let collection = JsonCollection::new(&store, COLLECTION);

    let err = collection.add_or_update("A", "1").await.unwrap_err();

    assert_eq!(err.kind(), AggregationErrorKind::CollectionNotFound);
    assert_eq!(err.collection(), COLLECTION);
    assert!(!store.contains(COLLECTION));
    assert_eq!(store.slot_count(), 0);
}

#[tokio::test]
async fn test_auth_failure_surfaces_with_hint() {
    let store = RecordingStore::new(EventLog::new())
        .failing_get(StoreError::auth("ExpiredTokenException: token expired"));
    let collection = JsonCollection::new(&store, COLLECTION);

    let err = collection.get_all().await.unwrap_err();

    match &err {
        AggregationError::AuthFailure {
            backend,
            collection,
            hint,
            ..
        } => {
            assert_eq!(*backend, "recording store");
            assert_eq!(collection, COLLECTION);
            assert!(hint.contains("aws sso login"));
        }
        other => panic!("expected auth failure, got {other:?}"),
    }
    assert!(err.to_string().contains("aws sso login"));
}

#[tokio::test]
async fn test_other_store_errors_keep_context() {
    let store = RecordingStore::new(EventLog::new())
        .failing_get(StoreError::other("ThrottlingException: Rate exceeded"));
    let collection = JsonCollection::new(&store, COLLECTION);

    let err = collection.add_or_update("A", "1").await.unwrap_err();

    assert_eq!(err.kind(), AggregationErrorKind::Other);
    assert!(err.to_string().contains("Rate exceeded"));
    assert!(err.to_string().contains(COLLECTION));
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_get_missing_key() {
    let store = MemoryBlobStore::new().with_slot(COLLECTION, r#"{"A":"1"}"#);
    let collection = JsonCollection::new(&store, COLLECTION);

    let err = collection.get("MISSING").await.unwrap_err();
    assert_eq!(err.kind(), AggregationErrorKind::KeyNotFound);
}
