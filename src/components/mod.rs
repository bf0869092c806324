//! Service handles used by a notifier run. Each is constructed once at
//! startup and passed by reference.

pub mod credential_store;
pub mod google_calendar;
pub mod publisher;

pub use credential_store::CredentialStore;
pub use google_calendar::{AccessCredential, CalendarClient, CalendarEvent, TokenManager};
pub use publisher::{Delivery, Publisher};
