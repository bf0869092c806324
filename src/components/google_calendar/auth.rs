use super::token::{AccessCredential, TokenManager};
use crate::components::credential_store::CredentialStore;
use crate::config::{Config, CALENDAR_READONLY_SCOPE, OOB_REDIRECT_URI};
use crate::error::{authorization_error, NotifierResult};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use url::Url;

/// Supplies the one-time code the operator copies from the consent page
#[async_trait]
pub trait CodeSource: Send {
    /// Show `authorization_url` to the operator and return the line they enter
    async fn read_code(&mut self, authorization_url: &str) -> NotifierResult<String>;
}

/// Prompts on stdout and blocks on a single line of stdin
#[derive(Debug, Default)]
pub struct StdinCodeSource;

#[async_trait]
impl CodeSource for StdinCodeSource {
    async fn read_code(&mut self, authorization_url: &str) -> NotifierResult<String> {
        println!(
            "Go to the following link in your browser then type the authorization code:\n{}",
            authorization_url
        );

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        if read == 0 {
            return Err(authorization_error("Standard input closed before a code was entered"));
        }
        Ok(line)
    }
}

/// Returns a fixed answer; stands in for the operator in tests and scripted setups
#[derive(Debug, Clone)]
pub struct FixedCodeSource {
    code: String,
    /// Last URL that was presented
    pub presented_url: Option<String>,
}

impl FixedCodeSource {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            presented_url: None,
        }
    }
}

#[async_trait]
impl CodeSource for FixedCodeSource {
    async fn read_code(&mut self, authorization_url: &str) -> NotifierResult<String> {
        self.presented_url = Some(authorization_url.to_string());
        Ok(self.code.clone())
    }
}

/// How the credential for this run was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Cached,
    Interactive,
}

/// Obtains the calendar credential: from the store when cached, otherwise by
/// asking the operator for a code and exchanging it.
pub struct AuthorizationFlow<'a> {
    store: &'a dyn CredentialStore,
    tokens: &'a TokenManager,
    credential_key: String,
    auth_url: String,
    client_id: String,
}

impl<'a> AuthorizationFlow<'a> {
    pub fn new(config: &Config, store: &'a dyn CredentialStore, tokens: &'a TokenManager) -> Self {
        Self {
            store,
            tokens,
            credential_key: config.credential_key.clone(),
            auth_url: config.auth_url.clone(),
            client_id: config.google_client_id.clone(),
        }
    }

    /// Consent page URL for the read-only calendar scope with the out-of-band redirect
    pub fn authorization_url(&self, state: &str) -> NotifierResult<String> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| authorization_error(&format!("Invalid authorization URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", OOB_REDIRECT_URI)
            .append_pair("response_type", "code")
            .append_pair("scope", CALENDAR_READONLY_SCOPE)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    /// Load the cached credential, falling back to the interactive exchange on a miss
    pub async fn acquire(
        &self,
        source: &mut dyn CodeSource,
    ) -> NotifierResult<(AccessCredential, CredentialOrigin)> {
        if let Some(credential) = self.store.load(&self.credential_key).await? {
            info!(
                "Using cached credential from {}",
                self.store.location(&self.credential_key)
            );
            return Ok((credential, CredentialOrigin::Cached));
        }

        info!(
            "No credential at {}, starting interactive authorization",
            self.store.location(&self.credential_key)
        );
        let credential = self.authorize_interactively(source).await?;
        Ok((credential, CredentialOrigin::Interactive))
    }

    /// Prompt for a code, exchange it, and persist the result. One attempt; any failure is final.
    pub async fn authorize_interactively(
        &self,
        source: &mut dyn CodeSource,
    ) -> NotifierResult<AccessCredential> {
        let state = uuid::Uuid::new_v4().to_string();
        let url = self.authorization_url(&state)?;

        let input = source.read_code(&url).await?;
        let code = parse_code(&input)?;

        let credential = self.tokens.exchange_code(code).await.inspect_err(|e| {
            error!("Unable to retrieve token from web: {}", e);
        })?;

        self.store
            .save(&self.credential_key, &credential)
            .await
            .inspect_err(|e| error!("Unable to cache oauth token: {}", e))?;

        Ok(credential)
    }
}

/// First whitespace-separated token of the operator's input
fn parse_code(input: &str) -> NotifierResult<&str> {
    input
        .split_whitespace()
        .next()
        .ok_or_else(|| authorization_error("No authorization code entered"))
}
