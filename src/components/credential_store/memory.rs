use super::{decode, CredentialStore};
use crate::components::google_calendar::AccessCredential;
use crate::error::NotifierResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// In-process store holding serialized objects, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    objects: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored body for a key
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.objects.lock().await.get(key).cloned()
    }

    /// Store a raw body, bypassing serialization
    pub async fn put_raw(&self, key: &str, body: &str) {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), body.to_string());
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn location(&self, key: &str) -> String {
        format!("memory:{}", key)
    }

    async fn load(&self, key: &str) -> NotifierResult<Option<AccessCredential>> {
        let objects = self.objects.lock().await;
        match objects.get(key) {
            Some(body) => decode(body, &self.location(key)).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, credential: &AccessCredential) -> NotifierResult<()> {
        let body = serde_json::to_string(credential)?;
        info!("Saving credential to {}", self.location(key));
        self.objects.lock().await.insert(key.to_string(), body);
        Ok(())
    }
}
