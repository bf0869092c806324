//! Durable storage for the calendar credential.
//!
//! A credential object is addressed by a bucket name and an object key. A key
//! that was never written loads as `None`; the caller falls back to the
//! interactive authorization flow in that case.

mod file;
mod memory;
mod redis_backend;

pub use self::file::FileCredentialStore;
pub use self::memory::MemoryCredentialStore;
pub use self::redis_backend::RedisCredentialStore;

use crate::components::google_calendar::AccessCredential;
use crate::config::{Config, CredentialBackend};
use crate::error::NotifierResult;
use async_trait::async_trait;

/// Load and save the persisted credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Human-readable location, used in log lines
    fn location(&self, key: &str) -> String;

    /// Read the credential stored under `key`, `None` when nothing was stored
    async fn load(&self, key: &str) -> NotifierResult<Option<AccessCredential>>;

    /// Write the credential under `key`, replacing any previous one
    async fn save(&self, key: &str, credential: &AccessCredential) -> NotifierResult<()>;
}

/// Build the store selected by the configuration
pub fn from_config(config: &Config) -> NotifierResult<Box<dyn CredentialStore>> {
    let store: Box<dyn CredentialStore> = match config.credential_backend {
        CredentialBackend::Redis => Box::new(RedisCredentialStore::new(
            &config.redis_url,
            &config.credential_bucket,
        )?),
        CredentialBackend::File => Box::new(FileCredentialStore::new(
            &config.credential_dir,
            &config.credential_bucket,
        )),
        CredentialBackend::Memory => Box::new(MemoryCredentialStore::new()),
    };
    Ok(store)
}

/// Decode a stored object body
fn decode(body: &str, location: &str) -> NotifierResult<AccessCredential> {
    serde_json::from_str(body).map_err(|e| {
        crate::error::credential_store_error(&format!(
            "Failed to parse credential at {}: {}",
            location, e
        ))
    })
}
