use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calendar_notifier::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_notifier::config))]
    Config(String),

    #[error("Credential store error: {0}")]
    #[diagnostic(
        code(calendar_notifier::credential_store),
        help("the credential must be persisted for future runs; check the store backend and bucket")
    )]
    CredentialStore(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(calendar_notifier::authorization),
        help("re-run and paste a fresh authorization code")
    )]
    Authorization(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calendar_notifier::google_calendar))]
    GoogleCalendar(String),

    #[error("Publish error: {0}")]
    #[diagnostic(code(calendar_notifier::publish))]
    Publish(String),

    #[error("HTTP transport error: {0}")]
    #[diagnostic(code(calendar_notifier::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(calendar_notifier::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendar_notifier::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendar_notifier::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type NotifierResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create credential store errors
pub fn credential_store_error(message: &str) -> Error {
    Error::CredentialStore(message.to_string())
}

/// Helper to create authorization errors
pub fn authorization_error(message: &str) -> Error {
    Error::Authorization(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create publish errors
pub fn publish_error(message: &str) -> Error {
    Error::Publish(message.to_string())
}
