mod console;
pub mod oauth1;
mod status;

pub use console::ConsolePublisher;
pub use oauth1::RequestSigner;
pub use status::StatusPublisher;

use crate::config::{Config, PublishTarget};
use crate::error::NotifierResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// What happened to a published digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint answered; any status, 2xx or not
    Posted(StatusCode),
    /// Written to standard output
    Printed,
}

/// Sends the digest somewhere
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Errors are transport-level only; an HTTP error status is still a `Delivery`
    async fn publish(&self, status: &str) -> NotifierResult<Delivery>;
}

/// Build the publisher selected by the configuration
pub fn from_config(config: &Config, client: Client) -> Box<dyn Publisher> {
    match config.publish_target {
        PublishTarget::Status => Box::new(StatusPublisher::new(config, client)),
        PublishTarget::Stdout => Box::new(ConsolePublisher),
    }
}
