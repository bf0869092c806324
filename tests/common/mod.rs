#![allow(dead_code)]

use calendar_notifier::components::credential_store::MemoryCredentialStore;
use calendar_notifier::components::publisher;
use calendar_notifier::config::{Config, CredentialBackend, PostingCredentials};
use calendar_notifier::notifier::Services;
use chrono::{DateTime, TimeZone, Utc};

pub const STATUS_PATH: &str = "/1.1/statuses/update.json";
pub const EVENTS_PATH: &str = "/calendars/primary/events";

/// Config pointing every endpoint at a fake server
pub fn test_config(server_url: &str) -> Config {
    Config {
        credential_bucket: "test-bucket".to_string(),
        credential_backend: CredentialBackend::Memory,
        google_client_id: "test_client_id".to_string(),
        google_client_secret: "test_client_secret".to_string(),
        token_url: format!("{}/token", server_url),
        calendar_api_base: server_url.to_string(),
        status_update_url: format!("{}{}", server_url, STATUS_PATH),
        posting: PostingCredentials {
            consumer_key: "consumer_key".to_string(),
            consumer_secret: "consumer_secret".to_string(),
            access_token: "access_token".to_string(),
            access_token_secret: "access_token_secret".to_string(),
        },
        ..Config::default()
    }
}

/// Services over a shared in-memory store the test can inspect
pub fn test_services(config: Config, store: &MemoryCredentialStore) -> Services {
    let client = reqwest::Client::new();
    let publisher = publisher::from_config(&config, client.clone());
    Services::new(config, client, Box::new(store.clone()), publisher)
}

/// Fixed run time: 2016-05-30T00:00:00Z
pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 5, 30, 0, 0, 0).unwrap()
}
