use super::{decode, CredentialStore};
use crate::components::google_calendar::AccessCredential;
use crate::error::{credential_store_error, NotifierResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{debug, info};

/// Credential objects kept in Redis under `"{bucket}/{key}"`
pub struct RedisCredentialStore {
    client: RedisClient,
    bucket: String,
}

impl RedisCredentialStore {
    pub fn new(redis_url: &str, bucket: &str) -> NotifierResult<Self> {
        let client = RedisClient::open(redis_url)
            .map_err(|e| credential_store_error(&format!("Failed to create Redis client: {}", e)))?;
        Ok(Self {
            client,
            bucket: bucket.to_string(),
        })
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}/{}", self.bucket, key)
    }

    async fn connection(&self) -> NotifierResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| credential_store_error(&format!("Failed to connect to Redis: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    fn location(&self, key: &str) -> String {
        format!("redis:{}", self.object_key(key))
    }

    async fn load(&self, key: &str) -> NotifierResult<Option<AccessCredential>> {
        let mut conn = self.connection().await?;
        let object_key = self.object_key(key);

        let body: Option<String> = conn.get(&object_key).await.map_err(|e| {
            credential_store_error(&format!("Failed to read {} from Redis: {}", object_key, e))
        })?;

        match body {
            Some(body) => {
                debug!("Loaded credential from {}", self.location(key));
                decode(&body, &self.location(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, credential: &AccessCredential) -> NotifierResult<()> {
        info!("Saving credential to {}", self.location(key));
        let mut conn = self.connection().await?;
        let object_key = self.object_key(key);
        let body = serde_json::to_string(credential)?;

        () = conn.set(&object_key, body).await.map_err(|e| {
            credential_store_error(&format!("Failed to save {} to Redis: {}", object_key, e))
        })?;

        Ok(())
    }
}
