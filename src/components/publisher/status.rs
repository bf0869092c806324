use super::oauth1::RequestSigner;
use super::{Delivery, Publisher};
use crate::config::Config;
use crate::error::{publish_error, NotifierResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::info;
use url::Url;

/// Posts the digest as a status update with an OAuth 1.0a signed form POST
pub struct StatusPublisher {
    client: Client,
    endpoint: String,
    signer: RequestSigner,
}

impl StatusPublisher {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            endpoint: config.status_update_url.clone(),
            signer: RequestSigner::new(config.posting.clone()),
        }
    }
}

#[async_trait]
impl Publisher for StatusPublisher {
    async fn publish(&self, status: &str) -> NotifierResult<Delivery> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| publish_error(&format!("Invalid status endpoint: {}", e)))?;

        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let authorization = self.signer.authorization_header(
            "POST",
            &url,
            &[("status", status)],
            &nonce,
            Utc::now().timestamp(),
        )?;

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!("status={}", urlencoding::encode(status)))
            .send()
            .await?;

        info!("Response: {}", response.status());
        Ok(Delivery::Posted(response.status()))
    }
}
