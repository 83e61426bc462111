pub mod claims;
pub mod config;
mod consts;
pub mod directory;
pub mod endpoints;
mod handler_error;
mod roles;
mod state;

use std::sync::Arc;

use axum::{http::{header, HeaderValue}, middleware, response::Response, routing::{get, post}, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::{Config, ConfigError};
use consts::NO_CACHE_HEADER;
use directory::OrderCloudClient;
use endpoints::{assets, createuser, syncuser};

pub use handler_error::HandlerError;
pub use state::AppState;

/// Every route of the adapter.
pub fn router(state: AppState) -> Router {
  Router::new()
    // Integration events, called by OrderCloud during an OpenID Connect login
    .route("/integration-events/createuser", post(createuser))
    .route("/integration-events/syncuser", post(syncuser))
    // Single page application
    .route("/", get(assets))
    .route("/*path", get(assets))
    .layer(middleware::map_response(disable_caching))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Disable browser and intermediary caching on every response, including
/// conditional requests.
async fn disable_caching(mut response: Response) -> Response {
  let headers = response.headers_mut();

  for (name, value) in NO_CACHE_HEADER {
    headers.insert(name, HeaderValue::from_static(value));
  }

  // Source: https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/ETag
  headers.remove(header::ETAG);
  headers.remove(header::LAST_MODIFIED);

  response
}

/// Bind the configured port and serve until ctrl-c.
pub async fn serve(config: Config) -> Result<(), ConfigError> {
  let directory = OrderCloudClient::new(
    config.base_api_url.clone(),
    config.directory_timeout()
  )?;

  let state = AppState::new(&config, Arc::new(directory));

  let listener = TcpListener::bind(("0.0.0.0", config.port))
    .await
    .map_err(|source| ConfigError::Listen { port: config.port, source })?;

  info!("Listening on port {port} - http://localhost:{port}", port = config.port);

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|source| ConfigError::Listen { port: config.port, source })
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!("Could not listen for ctrl-c: {e}");
  }
}
