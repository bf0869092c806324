mod auth;
mod client;
pub mod digest;
pub mod models;
pub mod token;

pub use auth::{AuthorizationFlow, CodeSource, CredentialOrigin, FixedCodeSource, StdinCodeSource};
pub use client::CalendarClient;
pub use digest::format_events;
pub use models::{CalendarEvent, EventDateTime};
pub use token::{AccessCredential, TokenManager};
