use crate::config::Config;
use crate::error::{authorization_error, google_calendar_error, NotifierResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Access tokens this close to expiry are treated as expired
const EXPIRY_SKEW_SECS: i64 = 10;

/// Bearer credential for the calendar API, as persisted in the credential store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl AccessCredential {
    /// A credential with no refresh token and no expiry
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: Some("Bearer".to_string()),
            refresh_token: None,
            expiry: None,
        }
    }

    /// True when an expiry is known and has (nearly) passed. No expiry means no known deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// `None` when `expires_in` does not fit in a timestamp
    fn into_credential(
        self,
        now: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Option<AccessCredential> {
        let expiry = match self.expires_in {
            Some(secs) => Some(Duration::try_seconds(secs).and_then(|d| now.checked_add_signed(d))?),
            None => None,
        };

        Some(AccessCredential {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry,
        })
    }
}

/// Talks to the OAuth2 token endpoint
#[derive(Clone)]
pub struct TokenManager {
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    redirect_uri: String,
}

impl TokenManager {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            token_url: config.token_url.clone(),
            redirect_uri: crate::config::OOB_REDIRECT_URI.to_string(),
        }
    }

    /// Exchange a one-time authorization code for a credential
    pub async fn exchange_code(&self, code: &str) -> NotifierResult<AccessCredential> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| authorization_error(&format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(authorization_error(&format!(
                "Unable to retrieve token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| authorization_error(&format!("Failed to parse token response: {}", e)))?;

        info!("Authorization code exchanged for an access token");
        token
            .into_credential(Utc::now(), None)
            .ok_or_else(|| authorization_error("Token response has an out-of-range expires_in"))
    }

    /// Refresh an expired credential
    pub async fn refresh(&self, credential: &AccessCredential) -> NotifierResult<AccessCredential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| google_calendar_error("No refresh token in credential"))?;

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        debug!("Access token refreshed");
        token
            .into_credential(Utc::now(), Some(refresh_token.to_string()))
            .ok_or_else(|| google_calendar_error("Refresh response has an out-of-range expires_in"))
    }

    /// Return a usable credential: refreshed in memory when expired and refreshable, otherwise as given
    pub async fn ensure_fresh(
        &self,
        credential: &AccessCredential,
        now: DateTime<Utc>,
    ) -> NotifierResult<AccessCredential> {
        if credential.is_expired(now) && credential.refresh_token.is_some() {
            info!("Cached access token expired, refreshing");
            return self.refresh(credential).await;
        }
        Ok(credential.clone())
    }
}
