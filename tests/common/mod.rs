#![allow(dead_code)]

use std::{path::Path, sync::{Arc, Mutex}};

use async_trait::async_trait;
use axum::{body::{to_bytes, Body}, http::{header, HeaderMap, Request, StatusCode}, Router};
use clap::Parser;
use ordercloud_oidc_adapter::{config::Config, directory::{AccessToken, DirectoryClient, DirectoryError, DirectoryUser, NewUser, UserPatch}, router, AppState};
use serde_json::Value;
use surrealdb_jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

pub const BUYER_ID: &str = "acme";

/// A directory call the adapter made, with the token it was authorized with
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  Create {
    token: String,
    buyer_id: String,
    user: NewUser
  },
  Patch {
    token: String,
    company_id: String,
    user_id: String,
    patch: UserPatch
  }
}

pub enum Outcome {
  Succeed,
  /// `Errors` list of an OrderCloud error response, as JSON
  Api(&'static str),
  Unexpected(&'static str)
}

/// In-memory `DirectoryClient` recording every call
pub struct MockDirectory {
  pub calls: Mutex<Vec<Call>>,
  outcome: Outcome,
}

impl MockDirectory {
  pub fn new(outcome: Outcome) -> Arc<Self> {
    Arc::new(MockDirectory {
      calls: Mutex::new(Vec::new()),
      outcome
    })
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  fn result(&self, user: DirectoryUser) -> Result<DirectoryUser, DirectoryError> {
    match &self.outcome {
      Outcome::Succeed => Ok(user),
      Outcome::Api(errors) => Err(DirectoryError::Api {
        status: StatusCode::BAD_REQUEST,
        errors: serde_json::from_str(errors).unwrap()
      }),
      Outcome::Unexpected(body) => Err(DirectoryError::UnexpectedResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: body.to_string()
      })
    }
  }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
  async fn create_user(
    &self,
    token: &AccessToken,
    buyer_id: &str,
    user: &NewUser
  ) -> Result<DirectoryUser, DirectoryError> {
    // let concurrent requests interleave
    tokio::task::yield_now().await;

    self.calls.lock().unwrap().push(Call::Create {
      token: token.secret().to_string(),
      buyer_id: buyer_id.to_string(),
      user: user.clone()
    });

    self.result(DirectoryUser {
      id: format!("id-{}", user.username),
      username: user.username.clone(),
      email: user.email.clone().into(),
      first_name: user.first_name.clone().into(),
      last_name: user.last_name.clone().into(),
      active: user.active,
      company_id: buyer_id.to_string()
    })
  }

  async fn patch_user(
    &self,
    token: &AccessToken,
    company_id: &str,
    user_id: &str,
    patch: &UserPatch
  ) -> Result<DirectoryUser, DirectoryError> {
    tokio::task::yield_now().await;

    self.calls.lock().unwrap().push(Call::Patch {
      token: token.secret().to_string(),
      company_id: company_id.to_string(),
      user_id: user_id.to_string(),
      patch: patch.clone()
    });

    self.result(DirectoryUser {
      id: user_id.to_string(),
      username: "patched-username".into(),
      email: patch.email.clone().into(),
      first_name: patch.first_name.clone().into(),
      last_name: patch.last_name.clone().into(),
      active: true,
      company_id: company_id.to_string()
    })
  }
}

pub fn config(static_root: &Path) -> Config {
  Config::try_parse_from([
    "ordercloud-oidc-adapter",
    "--client-id", "my-client-id",
    "--open-id-connect-id", "okta",
    "--base-api-url", "https://api.example.com",
    "--buyer-id", BUYER_ID,
    "--roles", "Shopper MeAdmin",
    "--static-root", static_root.to_str().unwrap(),
  ]).unwrap()
}

pub fn app(directory: Arc<MockDirectory>) -> Router {
  app_with_root(directory, Path::new("public"))
}

pub fn app_with_root(directory: Arc<MockDirectory>, static_root: &Path) -> Router {
  router(AppState::new(&config(static_root), directory))
}

/// Sign claims the way an IDP would. The adapter never checks the signature.
pub fn id_token(claims: Value) -> String {
  encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(b"idp-signing-key")
  ).unwrap()
}

pub struct TestResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  pub body: Vec<u8>,
}

impl TestResponse {
  pub fn json(&self) -> Value {
    serde_json::from_slice(&self.body).unwrap()
  }

  pub fn text(&self) -> String {
    String::from_utf8(self.body.clone()).unwrap()
  }

  pub fn assert_no_store(&self) {
    assert_eq!(self.headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(self.headers[header::PRAGMA], "no-cache");
    assert!(self.headers.get(header::ETAG).is_none());
    assert!(self.headers.get(header::LAST_MODIFIED).is_none());
  }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
  let response = app.oneshot(request).await.unwrap();

  let status = response.status();
  let headers = response.headers().clone();
  let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

  TestResponse { status, headers, body }
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> TestResponse {
  send(
    app,
    Request::post(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  ).await
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
  send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}
