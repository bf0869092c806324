use calendar_notifier::components::credential_store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, RedisCredentialStore,
};
use calendar_notifier::components::google_calendar::AccessCredential;
use calendar_notifier::error::Error;
use chrono::{TimeZone, Utc};

fn sample_credential() -> AccessCredential {
    AccessCredential {
        access_token: "ya29.test_token".to_string(),
        token_type: Some("Bearer".to_string()),
        refresh_token: Some("1//test_refresh".to_string()),
        expiry: Some(Utc.with_ymd_and_hms(2016, 6, 1, 12, 30, 0).unwrap()),
    }
}

async fn assert_round_trip(store: &dyn CredentialStore) {
    let credential = sample_credential();
    store.save("calendar-token.json", &credential).await.unwrap();

    let loaded = store.load("calendar-token.json").await.unwrap();
    assert_eq!(loaded, Some(credential));

    // Overwrite replaces the whole record
    let minimal = AccessCredential::bearer("second");
    store.save("calendar-token.json", &minimal).await.unwrap();
    assert_eq!(store.load("calendar-token.json").await.unwrap(), Some(minimal));
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemoryCredentialStore::new();
    assert_round_trip(&store).await;
}

#[tokio::test]
async fn test_memory_store_location_names_the_key() {
    let store = MemoryCredentialStore::new();
    assert_eq!(store.location("calendar-token.json"), "memory:calendar-token.json");
    store.save("calendar-token.json", &sample_credential()).await.unwrap();
    assert!(store.raw("calendar-token.json").await.is_some());
}

#[tokio::test]
async fn test_memory_store_missing_key_is_none() {
    let store = MemoryCredentialStore::new();
    assert_eq!(store.load("never-written").await.unwrap(), None);
}

#[tokio::test]
async fn test_memory_store_body_is_json_record() {
    let store = MemoryCredentialStore::new();
    store.save("key", &sample_credential()).await.unwrap();

    let body: serde_json::Value = serde_json::from_str(&store.raw("key").await.unwrap()).unwrap();
    assert_eq!(body["access_token"], "ya29.test_token");
    assert_eq!(body["refresh_token"], "1//test_refresh");
    assert_eq!(body["expiry"], "2016-06-01T12:30:00Z");
}

#[tokio::test]
async fn test_corrupt_object_is_an_error_not_a_miss() {
    let store = MemoryCredentialStore::new();
    store.put_raw("key", "not json").await;

    let result = store.load("key").await;
    assert!(matches!(result, Err(Error::CredentialStore(_))));
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path(), "test-bucket");
    assert_round_trip(&store).await;

    assert!(dir.path().join("test-bucket").join("calendar-token.json").exists());
}

#[tokio::test]
async fn test_file_store_missing_key_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path(), "test-bucket");
    assert_eq!(store.load("calendar-token.json").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_buckets_are_separate() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileCredentialStore::new(dir.path(), "first");
    let second = FileCredentialStore::new(dir.path(), "second");

    first.save("token.json", &sample_credential()).await.unwrap();
    assert!(first.load("token.json").await.unwrap().is_some());
    assert_eq!(second.load("token.json").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_save_fails_when_bucket_path_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blocked"), "file in the way").unwrap();
    let store = FileCredentialStore::new(dir.path(), "blocked");

    let result = store.save("token.json", &sample_credential()).await;
    assert!(matches!(result, Err(Error::CredentialStore(_))));
}

/// Needs a Redis server; run with `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`
#[tokio::test]
#[ignore]
async fn test_redis_store_round_trip() {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let bucket = format!("test-{}", uuid::Uuid::new_v4());
    let store = RedisCredentialStore::new(&url, &bucket).unwrap();

    assert_eq!(store.load("calendar-token.json").await.unwrap(), None);
    assert_round_trip(&store).await;
}
