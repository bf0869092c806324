use super::{Delivery, Publisher};
use crate::error::NotifierResult;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Prints the digest to standard output instead of posting it
#[derive(Debug, Default)]
pub struct ConsolePublisher;

#[async_trait]
impl Publisher for ConsolePublisher {
    async fn publish(&self, status: &str) -> NotifierResult<Delivery> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(status.as_bytes()).await?;
        stdout.flush().await?;
        Ok(Delivery::Printed)
    }
}
