use crate::error::{config_error, env_error, NotifierResult};
use chrono::{DateTime, Duration, Utc};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::str::FromStr;
use tracing::warn;

/// Google OAuth2 authorization endpoint
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
/// Google Calendar v3 API base
pub const DEFAULT_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
/// Status update endpoint the digest is posted to
pub const DEFAULT_STATUS_UPDATE_URL: &str = "https://api.twitter.com/1.1/statuses/update.json";
/// Out-of-band redirect marker: the provider shows the code to the operator
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
/// Read-only calendar scope
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
/// Object key the credential is stored under
pub const DEFAULT_CREDENTIAL_KEY: &str = "calendar-token.json";
/// Header line of the posted digest
pub const DEFAULT_DIGEST_HEADER: &str = "参加予定のイベントです！";
pub const DEFAULT_WINDOW_DAYS: i64 = 15;
pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_CREDENTIAL_DIR: &str = ".credentials";

/// Optional non-secret tunables file
pub const CONFIG_FILE: &str = "config/notifier.toml";

/// Where the credential object lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialBackend {
    Redis,
    File,
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(config_error(&format!("Unknown credential backend: {}", other))),
        }
    }
}

/// Where the digest goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget {
    /// Signed POST to the status update endpoint
    Status,
    /// Print to standard output
    Stdout,
}

impl FromStr for PublishTarget {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" | "twitter" => Ok(Self::Status),
            "stdout" | "console" => Ok(Self::Stdout),
            other => Err(config_error(&format!("Unknown publish target: {}", other))),
        }
    }
}

/// Application-level keys for the status endpoint
#[derive(Debug, Clone, Default)]
pub struct PostingCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Tunables read from `config/notifier.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileOverrides {
    pub window_days: Option<i64>,
    pub max_results: Option<u32>,
    pub digest_header: Option<String>,
    pub publish_target: Option<String>,
    pub calendar_id: Option<String>,
}

/// Main configuration structure for a notifier run
#[derive(Debug, Clone)]
pub struct Config {
    /// Bucket addressing the credential object
    pub credential_bucket: String,
    /// Object key of the credential inside the bucket
    pub credential_key: String,
    pub credential_backend: CredentialBackend,
    pub redis_url: String,
    pub credential_dir: String,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub calendar_api_base: String,
    /// Google Calendar ID to read
    pub calendar_id: String,
    /// Look-ahead window in days
    pub window_days: i64,
    pub max_results: u32,
    pub digest_header: String,
    pub publish_target: PublishTarget,
    pub status_update_url: String,
    pub posting: PostingCredentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential_bucket: String::new(),
            credential_key: DEFAULT_CREDENTIAL_KEY.to_string(),
            credential_backend: CredentialBackend::Redis,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            credential_dir: DEFAULT_CREDENTIAL_DIR.to_string(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            calendar_api_base: DEFAULT_CALENDAR_API.to_string(),
            calendar_id: "primary".to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
            digest_header: DEFAULT_DIGEST_HEADER.to_string(),
            publish_target: PublishTarget::Status,
            status_update_url: DEFAULT_STATUS_UPDATE_URL.to_string(),
            posting: PostingCredentials::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> NotifierResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut overrides = FileOverrides::default();
        if let Ok(content) = fs::read_to_string(CONFIG_FILE) {
            match toml::from_str::<FileOverrides>(&content) {
                Ok(parsed) => overrides = parsed,
                Err(e) => warn!("Ignoring unreadable {}: {}", CONFIG_FILE, e),
            }
        }

        Self::from_sources(|name| env::var(name).ok(), overrides)
    }

    /// Build a config from a variable lookup and file overrides. Variables win over the file.
    pub fn from_sources<F>(lookup: F, overrides: FileOverrides) -> NotifierResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let secret = |name: &str| var(name).unwrap_or_default();

        let defaults = Config::default();

        let window_days = match var("WINDOW_DAYS") {
            Some(raw) => raw.parse::<i64>().map_err(|_| env_error("WINDOW_DAYS"))?,
            None => overrides.window_days.unwrap_or(defaults.window_days),
        };
        if window_days <= 0 {
            return Err(config_error("Window length must be at least one day"));
        }
        if window_end(Utc::now(), window_days).is_none() {
            return Err(config_error(&format!(
                "Window length of {} days is out of range",
                window_days
            )));
        }

        let max_results = match var("MAX_RESULTS") {
            Some(raw) => raw.parse::<u32>().map_err(|_| env_error("MAX_RESULTS"))?,
            None => overrides.max_results.unwrap_or(defaults.max_results),
        };

        let credential_backend = match var("CREDENTIAL_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.credential_backend,
        };

        let publish_target = match var("PUBLISH_TARGET").or(overrides.publish_target) {
            Some(raw) => raw.parse()?,
            None => defaults.publish_target,
        };

        let config = Config {
            credential_bucket: secret("CREDENTIAL_BUCKET"),
            credential_key: var("CREDENTIAL_KEY").unwrap_or(defaults.credential_key),
            credential_backend,
            redis_url: var("REDIS_URL").unwrap_or(defaults.redis_url),
            credential_dir: var("CREDENTIAL_DIR").unwrap_or(defaults.credential_dir),
            google_client_id: secret("GOOGLE_CLIENT_ID"),
            google_client_secret: secret("GOOGLE_CLIENT_SECRET"),
            auth_url: var("GOOGLE_AUTH_URL").unwrap_or(defaults.auth_url),
            token_url: var("GOOGLE_TOKEN_URL").unwrap_or(defaults.token_url),
            calendar_api_base: var("GOOGLE_CALENDAR_API").unwrap_or(defaults.calendar_api_base),
            calendar_id: var("GOOGLE_CALENDAR_ID")
                .or(overrides.calendar_id)
                .unwrap_or(defaults.calendar_id),
            window_days,
            max_results,
            digest_header: var("DIGEST_HEADER")
                .or(overrides.digest_header)
                .unwrap_or(defaults.digest_header),
            publish_target,
            status_update_url: var("STATUS_UPDATE_URL").unwrap_or(defaults.status_update_url),
            posting: if publish_target == PublishTarget::Status {
                PostingCredentials {
                    consumer_key: secret("TWITTER_CONSUMER_KEY"),
                    consumer_secret: secret("TWITTER_CONSUMER_SECRET"),
                    access_token: secret("TWITTER_ACCESS_TOKEN"),
                    access_token_secret: secret("TWITTER_ACCESS_TOKEN_SECRET"),
                }
            } else {
                PostingCredentials::default()
            },
        };

        // Missing secrets are not rejected here; they fail downstream
        for name in config.missing_settings() {
            warn!("{} is not set", name);
        }

        Ok(config)
    }

    /// Empty settings the selected backend and publish target depend on
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.credential_backend != CredentialBackend::Memory && self.credential_bucket.is_empty() {
            missing.push("CREDENTIAL_BUCKET");
        }
        if self.google_client_id.is_empty() {
            missing.push("GOOGLE_CLIENT_ID");
        }
        if self.google_client_secret.is_empty() {
            missing.push("GOOGLE_CLIENT_SECRET");
        }
        if self.publish_target == PublishTarget::Status {
            let posting = [
                ("TWITTER_CONSUMER_KEY", &self.posting.consumer_key),
                ("TWITTER_CONSUMER_SECRET", &self.posting.consumer_secret),
                ("TWITTER_ACCESS_TOKEN", &self.posting.access_token),
                ("TWITTER_ACCESS_TOKEN_SECRET", &self.posting.access_token_secret),
            ];
            missing.extend(posting.iter().filter(|(_, v)| v.is_empty()).map(|(name, _)| *name));
        }
        missing
    }
}

/// End of a look-ahead window of `days` starting at `start`, `None` when out of range
pub fn window_end(start: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|d| start.checked_add_signed(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_sources(lookup(&[]), FileOverrides::default()).unwrap();
        assert_eq!(config.window_days, 15);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.credential_key, "calendar-token.json");
        assert_eq!(config.credential_backend, CredentialBackend::Redis);
        assert_eq!(config.publish_target, PublishTarget::Status);
        assert!(config.google_client_id.is_empty());
    }

    #[test]
    fn test_environment_values_are_used() {
        let config = Config::from_sources(
            lookup(&[
                ("CREDENTIAL_BUCKET", "tokens"),
                ("GOOGLE_CLIENT_ID", "client"),
                ("WINDOW_DAYS", "7"),
                ("CREDENTIAL_BACKEND", "file"),
                ("PUBLISH_TARGET", "stdout"),
                ("TWITTER_CONSUMER_KEY", "ignored"),
            ]),
            FileOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.credential_bucket, "tokens");
        assert_eq!(config.google_client_id, "client");
        assert_eq!(config.window_days, 7);
        assert_eq!(config.credential_backend, CredentialBackend::File);
        assert_eq!(config.publish_target, PublishTarget::Stdout);
        assert!(config.posting.consumer_key.is_empty());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let overrides = FileOverrides {
            window_days: Some(30),
            digest_header: Some("From file".to_string()),
            ..Default::default()
        };
        let config = Config::from_sources(lookup(&[("WINDOW_DAYS", "7")]), overrides).unwrap();
        assert_eq!(config.window_days, 7);
        assert_eq!(config.digest_header, "From file");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_sources(lookup(&[("WINDOW_DAYS", "week")]), FileOverrides::default()).is_err());
        assert!(Config::from_sources(lookup(&[("WINDOW_DAYS", "0")]), FileOverrides::default()).is_err());
        assert!(Config::from_sources(lookup(&[("WINDOW_DAYS", "1000000000000000")]), FileOverrides::default()).is_err());
        assert!(Config::from_sources(lookup(&[("WINDOW_DAYS", "100000000000")]), FileOverrides::default()).is_err());
        assert!(Config::from_sources(lookup(&[("CREDENTIAL_BACKEND", "s4")]), FileOverrides::default()).is_err());
        assert!(Config::from_sources(lookup(&[("PUBLISH_TARGET", "fax")]), FileOverrides::default()).is_err());
    }

    #[test]
    fn test_oversized_window_from_file_is_rejected() {
        let overrides = FileOverrides {
            window_days: Some(i64::MAX),
            ..Default::default()
        };
        assert!(Config::from_sources(lookup(&[]), overrides).is_err());
    }

    #[test]
    fn test_window_end() {
        let start = Utc::now();
        assert_eq!(window_end(start, 7), Some(start + Duration::days(7)));
        assert_eq!(window_end(start, 1_000_000_000_000_000), None);
        assert_eq!(window_end(start, 100_000_000_000), None);
    }

    #[test]
    fn test_missing_settings_follow_backend_and_target() {
        let config = Config::from_sources(
            lookup(&[("CREDENTIAL_BACKEND", "memory"), ("PUBLISH_TARGET", "stdout")]),
            FileOverrides::default(),
        )
        .unwrap();
        assert_eq!(
            config.missing_settings(),
            vec!["GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"]
        );

        let config = Config::from_sources(
            lookup(&[("GOOGLE_CLIENT_ID", "id"), ("GOOGLE_CLIENT_SECRET", "secret")]),
            FileOverrides::default(),
        )
        .unwrap();
        assert_eq!(
            config.missing_settings(),
            vec![
                "CREDENTIAL_BUCKET",
                "TWITTER_CONSUMER_KEY",
                "TWITTER_CONSUMER_SECRET",
                "TWITTER_ACCESS_TOKEN",
                "TWITTER_ACCESS_TOKEN_SECRET",
            ]
        );
    }

    #[test]
    fn test_file_overrides_parse() {
        let overrides: FileOverrides =
            toml::from_str("window_days = 7\ndigest_header = \"This week\"\n").unwrap();
        assert_eq!(overrides.window_days, Some(7));
        assert_eq!(overrides.digest_header.as_deref(), Some("This week"));
        assert_eq!(overrides.max_results, None);
    }
}
