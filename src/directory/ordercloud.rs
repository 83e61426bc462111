use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{AccessToken, DirectoryClient, DirectoryError, DirectoryUser, NewUser, UserPatch};

// Source: https://ordercloud.io/knowledge-base/errors
#[derive(Deserialize)]
struct ApiErrorResponse {
  #[serde(rename = "Errors")]
  errors: Vec<serde_json::Value>
}

/// `DirectoryClient` backed by the OrderCloud REST API.
/// Holds no credentials of its own.
#[derive(Clone, Debug)]
pub struct OrderCloudClient {
  http: Client,
  base_api_url: Url,
}

impl OrderCloudClient {
  pub fn new(base_api_url: Url, timeout: Duration) -> Result<Self, DirectoryError> {
    if base_api_url.cannot_be_a_base() {
      return Err(DirectoryError::BaseUrl(base_api_url))
    }

    Ok(OrderCloudClient {
      http: Client::builder()
        .timeout(timeout)
        .build()?,
      base_api_url
    })
  }

  /// `{base}/v1/buyers/{buyer_id}/users[/{user_id}]`
  fn users_url(&self, buyer_id: &str, user_id: Option<&str>) -> Result<Url, DirectoryError> {
    let mut url = self.base_api_url.clone();

    url.path_segments_mut()
      .map_err(|()| DirectoryError::BaseUrl(self.base_api_url.clone()))?
      .pop_if_empty()
      .extend(["v1", "buyers", buyer_id, "users"])
      .extend(user_id);

    Ok(url)
  }

  async fn send(
    &self,
    token: &AccessToken,
    request: RequestBuilder
  ) -> Result<DirectoryUser, DirectoryError> {
    let response = request
      .bearer_auth(token.secret())
      .send()
      .await?;

    let status = response.status();

    if status.is_success() {
      return Ok(response.json().await?)
    }

    let body = response.text().await?;

    debug!(%status, "OrderCloud error response");

    match serde_json::from_str::<ApiErrorResponse>(&body) {
      Ok(ApiErrorResponse { errors }) => Err(DirectoryError::Api { status, errors }),
      Err(_) => Err(DirectoryError::UnexpectedResponse { status, body })
    }
  }
}

#[async_trait]
impl DirectoryClient for OrderCloudClient {
  // Source: https://ordercloud.io/api-reference/buyers/users/create
  async fn create_user(
    &self,
    token: &AccessToken,
    buyer_id: &str,
    user: &NewUser
  ) -> Result<DirectoryUser, DirectoryError> {
    let url = self.users_url(buyer_id, None)?;

    self.send(token, self.http.post(url).json(user)).await
  }

  // Source: https://ordercloud.io/api-reference/buyers/users/patch
  async fn patch_user(
    &self,
    token: &AccessToken,
    company_id: &str,
    user_id: &str,
    patch: &UserPatch
  ) -> Result<DirectoryUser, DirectoryError> {
    let url = self.users_url(company_id, Some(user_id))?;

    self.send(token, self.http.patch(url).json(patch)).await
  }
}
