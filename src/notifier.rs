use crate::components::credential_store::{self, CredentialStore};
use crate::components::google_calendar::{format_events, AuthorizationFlow, CalendarClient, CodeSource, TokenManager};
use crate::components::publisher::{self, Delivery, Publisher};
use crate::config::{window_end, Config};
use crate::error::{config_error, NotifierResult};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

/// Handles for one run, created once at process start
pub struct Services {
    pub config: Config,
    pub store: Box<dyn CredentialStore>,
    pub tokens: TokenManager,
    pub calendar: CalendarClient,
    pub publisher: Box<dyn Publisher>,
}

impl Services {
    /// Wire up the handles selected by the configuration, sharing one HTTP client
    pub fn from_config(config: Config) -> NotifierResult<Self> {
        let client = Client::new();
        let store = credential_store::from_config(&config)?;
        let publisher = publisher::from_config(&config, client.clone());
        Ok(Self::new(config, client, store, publisher))
    }

    /// Wire up with an explicit store and publisher
    pub fn new(
        config: Config,
        client: Client,
        store: Box<dyn CredentialStore>,
        publisher: Box<dyn Publisher>,
    ) -> Self {
        let tokens = TokenManager::new(&config, client.clone());
        let calendar = CalendarClient::new(&config, client, tokens.clone());
        Self {
            config,
            store,
            tokens,
            calendar,
            publisher,
        }
    }
}

/// How a run ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing in the window; nothing was published
    NoEvents,
    /// Digest accepted (2xx) or printed
    Published(Delivery),
    /// The endpoint answered with a non-2xx status
    Rejected(StatusCode),
    /// The endpoint could not be reached
    PublishFailed,
}

/// One pass: credential, events in `[now, now + window]`, digest, publish.
///
/// Credential and event-list failures are returned as errors and end the
/// run. Publishing problems are logged and reported through the outcome.
pub async fn run_once(
    services: &Services,
    source: &mut dyn CodeSource,
    now: DateTime<Utc>,
) -> NotifierResult<RunOutcome> {
    let config = &services.config;

    let time_max = window_end(now, config.window_days).ok_or_else(|| {
        config_error(&format!(
            "Window length of {} days is out of range",
            config.window_days
        ))
    })?;

    let flow = AuthorizationFlow::new(config, services.store.as_ref(), &services.tokens);
    let (credential, origin) = flow.acquire(source).await?;
    info!("Calendar credential ready ({:?})", origin);

    let events = services
        .calendar
        .list_upcoming(&credential, now, time_max, config.max_results)
        .await
        .inspect_err(|e| error!("Unable to retrieve next events: {}", e))?;

    if events.is_empty() {
        info!("No upcoming events found.");
        return Ok(RunOutcome::NoEvents);
    }

    let digest = format_events(&config.digest_header, &events);

    let outcome = match services.publisher.publish(&digest).await {
        Ok(Delivery::Posted(status)) if !status.is_success() => {
            warn!("Status update rejected: {}", status);
            RunOutcome::Rejected(status)
        }
        Ok(delivery) => {
            info!("Published digest of {} events", events.len());
            RunOutcome::Published(delivery)
        }
        Err(e) => {
            error!("Unable to publish digest: {}", e);
            RunOutcome::PublishFailed
        }
    };

    Ok(outcome)
}
