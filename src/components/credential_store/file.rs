use super::{decode, CredentialStore};
use crate::components::google_calendar::AccessCredential;
use crate::error::{credential_store_error, NotifierResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Credential objects kept as files under `{root}/{bucket}/{key}`
pub struct FileCredentialStore {
    bucket_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(root: impl Into<PathBuf>, bucket: &str) -> Self {
        Self {
            bucket_dir: root.into().join(bucket),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.bucket_dir.join(key)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    fn location(&self, key: &str) -> String {
        self.path(key).display().to_string()
    }

    async fn load(&self, key: &str) -> NotifierResult<Option<AccessCredential>> {
        let path = self.path(key);
        let body = match fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No credential file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(credential_store_error(&format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        decode(&body, &self.location(key)).map(Some)
    }

    async fn save(&self, key: &str, credential: &AccessCredential) -> NotifierResult<()> {
        let path = self.path(key);
        info!("Saving credential to {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                credential_store_error(&format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_string(credential)?;
        fs::write(&path, body).await.map_err(|e| {
            credential_store_error(&format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}
