use std::fmt;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::consts::NOT_AVAILABLE;

mod ordercloud;

pub use ordercloud::OrderCloudClient;

/// OrderCloud access token scoped to a single integration event.
/// It is passed to every directory call and never stored.
#[derive(Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
  pub fn new(token: impl Into<String>) -> Self {
    AccessToken(token.into())
  }

  pub fn secret(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for AccessToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AccessToken([redacted])")
  }
}

// Source: https://ordercloud.io/api-reference/buyers/users/get
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryUser {
  #[serde(rename = "ID")]
  pub id: String,
  pub username: String,
  #[serde(default)]
  pub email: StoredField,
  #[serde(default)]
  pub first_name: StoredField,
  #[serde(default)]
  pub last_name: StoredField,
  #[serde(default)]
  pub active: bool,
  #[serde(rename = "CompanyID", default)]
  pub company_id: String,
}

// Source: https://ordercloud.io/api-reference/buyers/users/create
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NewUser {
  pub username: String,
  #[serde(serialize_with = "or_not_available")]
  pub email: Option<String>,
  #[serde(serialize_with = "or_not_available")]
  pub first_name: Option<String>,
  #[serde(serialize_with = "or_not_available")]
  pub last_name: Option<String>,
  pub active: bool,
}

// Source: https://ordercloud.io/api-reference/buyers/users/patch
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UserPatch {
  #[serde(serialize_with = "or_not_available")]
  pub email: Option<String>,
  #[serde(serialize_with = "or_not_available")]
  pub first_name: Option<String>,
  #[serde(serialize_with = "or_not_available")]
  pub last_name: Option<String>,
}

/// Values the IDP didn't provide are written as `NOT_AVAILABLE`
fn or_not_available<S: Serializer>(
  value: &Option<String>,
  serializer: S
) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
}

/// A user field as OrderCloud holds it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoredField {
  Value(String),
  /// `NOT_AVAILABLE`, written when the IDP didn't provide a value
  NotAvailable,
  /// null or left out
  #[default]
  Missing,
}

impl StoredField {
  /// Whether the stored value no longer matches the IDP's claim.
  ///
  /// `NOT_AVAILABLE` was never set and never drifts. A missing value
  /// drifts once the IDP provides the claim.
  pub fn drifted_from(&self, claim: Option<&str>) -> bool {
    match self {
      StoredField::Value(value) => Some(value.as_str()) != claim,
      StoredField::NotAvailable => false,
      StoredField::Missing => claim.is_some(),
    }
  }
}

/// What OrderCloud holds after this adapter wrote `value`
impl From<Option<String>> for StoredField {
  fn from(value: Option<String>) -> Self {
    value.map_or(StoredField::NotAvailable, StoredField::Value)
  }
}

impl Serialize for StoredField {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      StoredField::Value(value) => serializer.serialize_str(value),
      StoredField::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
      StoredField::Missing => serializer.serialize_none(),
    }
  }
}

impl<'de> Deserialize<'de> for StoredField {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(
      match Option::<String>::deserialize(deserializer)? {
        None => StoredField::Missing,
        Some(value) if value == NOT_AVAILABLE => StoredField::NotAvailable,
        Some(value) => StoredField::Value(value),
      }
    )
  }
}

#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
  /// OrderCloud rejected the request and said why.
  /// `errors` are the entries of the response's `Errors` list as sent.
  ///
  /// Source: https://ordercloud.io/knowledge-base/errors
  #[error("OrderCloud responded {status}: {}", api_messages(.errors))]
  Api {
    status: StatusCode,
    errors: Vec<serde_json::Value>
  },
  #[error("OrderCloud request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("OrderCloud responded {status}: {body}")]
  UnexpectedResponse {
    status: StatusCode,
    body: String
  },
  #[error(r#"OrderCloud base url "{0}" cannot have a path"#)]
  BaseUrl(Url),
}

fn api_messages(errors: &[serde_json::Value]) -> String {
  errors.iter()
    .map(|e| match (
      e.get("Message").and_then(|m| m.as_str()),
      e.get("ErrorCode").and_then(|c| c.as_str())
    ) {
      (Some(message), Some(code)) => format!("{message} ({code})"),
      (Some(message), None) => message.to_string(),
      _ => e.to_string()
    })
    .join("; ")
}

/// User management calls against the directory platform.
///
/// Every call is authorized with the `token` passed to it.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
  async fn create_user(
    &self,
    token: &AccessToken,
    buyer_id: &str,
    user: &NewUser
  ) -> Result<DirectoryUser, DirectoryError>;

  async fn patch_user(
    &self,
    token: &AccessToken,
    company_id: &str,
    user_id: &str,
    patch: &UserPatch
  ) -> Result<DirectoryUser, DirectoryError>;
}
