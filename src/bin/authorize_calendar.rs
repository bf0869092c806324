use calendar_notifier::components::credential_store::{self, CredentialStore};
use calendar_notifier::components::google_calendar::{AuthorizationFlow, StdinCodeSource, TokenManager};
use calendar_notifier::startup;

/// Run the interactive authorization once and store the credential, so
/// scheduled runs start from a cached credential.
#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = startup::load_config()?;
    let store = credential_store::from_config(&config)?;
    let tokens = TokenManager::new(&config, reqwest::Client::new());

    let flow = AuthorizationFlow::new(&config, store.as_ref(), &tokens);
    flow.authorize_interactively(&mut StdinCodeSource).await?;

    println!(
        "Credential saved to {}",
        store.location(&config.credential_key)
    );

    Ok(())
}
