use calendar_notifier::components::google_calendar::StdinCodeSource;
use calendar_notifier::notifier::{self, Services};
use calendar_notifier::startup;
use chrono::Utc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calendar notifier");

    // Load configuration
    let config = startup::load_config()?;
    let services = Services::from_config(config)?;

    let outcome = notifier::run_once(&services, &mut StdinCodeSource, Utc::now()).await?;
    info!("Run finished: {:?}", outcome);

    Ok(())
}
