use std::process::ExitCode;

use clap::Parser;
use ordercloud_oidc_adapter::{config::Config, serve};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    )
    .init();

  // exits on invalid settings
  let config = Config::parse();

  if config.client_id.is_empty() {
    warn!("ORDERCLOUD_CLIENT_ID is not set, the application won't be able to log in");
  }

  match serve(config).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{e}");

      ExitCode::FAILURE
    }
  }
}
