use super::models::{CalendarEvent, EventsPage};
use super::token::{AccessCredential, TokenManager};
use crate::config::Config;
use crate::error::{google_calendar_error, NotifierResult};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Reads events from the Google Calendar v3 API
pub struct CalendarClient {
    client: Client,
    tokens: TokenManager,
    api_base: String,
    calendar_id: String,
}

impl CalendarClient {
    pub fn new(config: &Config, client: Client, tokens: TokenManager) -> Self {
        Self {
            client,
            tokens,
            api_base: config.calendar_api_base.clone(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    fn events_url(&self) -> NotifierResult<Url> {
        let url_str = format!(
            "{}/calendars/{}/events",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(&self.calendar_id)
        );
        Url::parse(&url_str).map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))
    }

    /// Events starting in `[time_min, time_max]`, recurring events expanded,
    /// cancelled ones excluded, ascending by start, at most `max_results`.
    pub async fn list_upcoming(
        &self,
        credential: &AccessCredential,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> NotifierResult<Vec<CalendarEvent>> {
        let credential = self.tokens.ensure_fresh(credential, Utc::now()).await?;

        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("orderBy", "startTime")
            .append_pair("showDeleted", "false")
            .append_pair("singleEvents", "true")
            .append_pair("timeMax", &time_max.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("timeMin", &time_min.to_rfc3339_opts(SecondsFormat::Secs, true));

        debug!("Fetching events from calendar {}", self.calendar_id);
        let response = self
            .client
            .get(url)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Unable to retrieve upcoming events: HTTP {} - {}",
                status, error_body
            )));
        }

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        let events: Vec<CalendarEvent> = page
            .items
            .into_iter()
            .filter(|event| event.status.as_deref() != Some("cancelled"))
            .take(max_results as usize)
            .collect();

        info!("Retrieved {} upcoming events", events.len());
        Ok(events)
    }
}
