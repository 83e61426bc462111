use axum::{extract::{rejection::JsonRejection, State}, Json};
use tracing::{error, info};
use uuid::Uuid;

use crate::{claims::{decode_id_token, IdentityClaims}, directory::NewUser, handler_error::HandlerError, state::AppState};

use super::{AdapterResponse, ProvisioningRequest};

/// Axum handler function for the `/integration-events/createuser` endpoint.
///
/// Called by OrderCloud after a user logged in with the IDP for the first
/// time, before they are redirected to the application. Creates a new
/// buyer user for them and returns its username.
pub async fn createuser(
  State(state): State<AppState>,
  body: Result<Json<ProvisioningRequest>, JsonRejection>
) -> AdapterResponse {
  match createuser_result(&state, body).await {
    Ok(username) => AdapterResponse::username(username),
    Err(e) => {
      error!("An error occurred while creating the user: {e}");

      AdapterResponse::error(&e)
    }
  }
}

async fn createuser_result(
  state: &AppState,
  body: Result<Json<ProvisioningRequest>, JsonRejection>
) -> Result<String, HandlerError> {
  let Json(ProvisioningRequest {
    access_token,
    token_response
  }) = body?;

  let claims = decode_id_token(&token_response.id_token)?;

  info!(
    sub = claims.sub.as_deref(),
    iss = claims.iss.as_deref(),
    exp = ?claims.exp,
    "User claims decoded from the IDP's id_token"
  );

  let new_user = new_user(claims);

  info!(buyer_id = %state.buyer_id, username = %new_user.username, "Creating user");

  let created = state.directory
    .create_user(&access_token, &state.buyer_id, &new_user)
    .await?;

  info!(username = %created.username, "Created user");

  // OrderCloud keeps the username we chose, so return ours
  Ok(new_user.username)
}

fn new_user(claims: IdentityClaims) -> NewUser {
  NewUser {
    // must be unique across the seller org
    username: Uuid::new_v4().to_string(),
    email: claims.email,
    first_name: claims.given_name,
    last_name: claims.family_name,
    active: true,
  }
}
