use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};

use crate::handler_error::HandlerError;

/// Body OrderCloud expects back from an integration event.
/// Exactly one of the two fields is set.
///
/// Failures are reported here with a 200 status, OrderCloud only
/// surfaces `ErrorMessage` to the user for successful responses.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AdapterResponse {
  pub error_message: Option<String>,
  pub username: Option<String>,
}

impl AdapterResponse {
  pub fn username(username: String) -> Self {
    AdapterResponse {
      error_message: None,
      username: Some(username)
    }
  }

  pub fn error(error: &HandlerError) -> Self {
    AdapterResponse {
      error_message: Some(error.error_message()),
      username: None
    }
  }
}

impl IntoResponse for AdapterResponse {
  fn into_response(self) -> Response {
    (StatusCode::OK, Json(self)).into_response()
  }
}
