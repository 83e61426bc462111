mod adapter_response;
mod createuser_endpoint;
mod syncuser_endpoint;

use serde::Deserialize;

use crate::directory::{AccessToken, DirectoryUser};

pub use adapter_response::AdapterResponse;
pub use createuser_endpoint::createuser;
pub use syncuser_endpoint::syncuser;

/// Token response OrderCloud received from the IDP
///
/// Source: https://openid.net/specs/openid-connect-core-1_0.html#TokenResponse
#[derive(Deserialize, Debug)]
pub struct IdpTokenResponse {
  pub id_token: String,
  // IDP api token, unused
  #[allow(dead_code)]
  pub access_token: Option<String>,
}

/// Body of the `createuser` integration event.
/// OrderCloud sends more fields than these, the rest are ignored.
#[derive(Deserialize, Debug)]
pub struct ProvisioningRequest {
  #[serde(rename = "OrderCloudAccessToken")]
  pub access_token: AccessToken,
  #[serde(rename = "TokenResponse")]
  pub token_response: IdpTokenResponse,
}

/// Body of the `syncuser` integration event
#[derive(Deserialize, Debug)]
pub struct SyncRequest {
  #[serde(flatten)]
  pub request: ProvisioningRequest,
  #[serde(rename = "ExistingUser")]
  pub existing_user: DirectoryUser,
}
