use std::{io, path::PathBuf, time::Duration};

use clap::Parser;
use url::Url;

use crate::{consts::{ORDERCLOUD_BASE_API_URL, ORDERCLOUD_BUYER_ID, ORDERCLOUD_CLIENT_ID, ORDERCLOUD_OPEN_ID_CONNECT_ID, ORDERCLOUD_ROLES}, directory::DirectoryError, roles::{parse_roles, Roles}};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
  #[error("Invalid ORDERCLOUD_ROLES: {0}")]
  InvalidRoles(String),
  #[error(r#"Invalid ORDERCLOUD_BASE_API_URL "{0}": must be an http(s) base url"#)]
  BaseUrl(String),
  #[error(transparent)]
  ParseUrl(#[from] url::ParseError),
  #[error("Could not build the OrderCloud client: {0}")]
  Directory(#[from] DirectoryError),
  #[error("Could not listen on port {port}: {source}")]
  Listen {
    port: u16,
    source: io::Error
  }
}

/// Webhook adapter between an OpenID Connect IDP and OrderCloud.
///
/// Every setting can also be provided through its environment variable.
/// Please ensure all settings match the values for your marketplace.
#[derive(Parser, Clone, Debug)]
#[command(name = "ordercloud-oidc-adapter", version)]
pub struct Config {
  /// Port to listen on
  #[arg(long, env = "PORT", default_value_t = 4451)]
  pub port: u16,

  /// OrderCloud API client the SPA logs in with
  #[arg(long, env = "ORDERCLOUD_CLIENT_ID", default_value = "")]
  pub client_id: String,

  /// ID of the OrderCloud OpenID Connect configuration
  #[arg(long, env = "ORDERCLOUD_OPEN_ID_CONNECT_ID", default_value = "google")]
  pub open_id_connect_id: String,

  /// OrderCloud API base url
  #[arg(
    long,
    env = "ORDERCLOUD_BASE_API_URL",
    default_value = "https://sandboxapi.ordercloud.io",
    value_parser = parse_base_url
  )]
  pub base_api_url: Url,

  /// Buyer organization new users are created in
  #[arg(long, env = "ORDERCLOUD_BUYER_ID", default_value = "buyer1")]
  pub buyer_id: String,

  /// Space separated list of roles granted to shoppers
  #[arg(long, env = "ORDERCLOUD_ROLES", default_value = "Shopper", value_parser = parse_roles)]
  pub roles: Roles,

  /// Directory the single page application is served from
  #[arg(long, env = "STATIC_ROOT", default_value = "public")]
  pub static_root: PathBuf,

  /// Timeout for each call to the OrderCloud API
  #[arg(long, env = "ORDERCLOUD_TIMEOUT_SECS", default_value_t = 30)]
  pub directory_timeout_secs: u64,
}

impl Config {
  pub fn directory_timeout(&self) -> Duration {
    Duration::from_secs(self.directory_timeout_secs)
  }

  /// Placeholder tokens in the SPA's static files and the values
  /// injected in their place.
  pub fn substitutions(&self) -> Vec<(&'static str, String)> {
    vec![
      (ORDERCLOUD_CLIENT_ID, self.client_id.clone()),
      (ORDERCLOUD_OPEN_ID_CONNECT_ID, self.open_id_connect_id.clone()),
      // `Url` always serializes with a trailing slash
      (ORDERCLOUD_BASE_API_URL, self.base_api_url.as_str().trim_end_matches('/').to_string()),
      (ORDERCLOUD_BUYER_ID, self.buyer_id.clone()),
      (ORDERCLOUD_ROLES, self.roles.to_scope_string()),
    ]
  }
}

fn parse_base_url(url: &str) -> Result<Url, ConfigError> {
  let parsed = Url::parse(url)?;

  if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
    return Err(ConfigError::BaseUrl(url.to_string()))
  }

  Ok(parsed)
}
