use axum::{extract::{rejection::JsonRejection, State}, Json};
use tracing::{error, info};

use crate::{claims::{decode_id_token, IdentityClaims}, directory::{DirectoryUser, UserPatch}, handler_error::HandlerError, state::AppState};

use super::{AdapterResponse, ProvisioningRequest, SyncRequest};

/// Axum handler function for the `/integration-events/syncuser` endpoint.
///
/// Called by OrderCloud on every login after the first one. Updates the
/// user's details when they changed in the IDP.
pub async fn syncuser(
  State(state): State<AppState>,
  body: Result<Json<SyncRequest>, JsonRejection>
) -> AdapterResponse {
  match syncuser_result(&state, body).await {
    Ok(username) => AdapterResponse::username(username),
    Err(e) => {
      error!("An error occurred while syncing the user: {e}");

      AdapterResponse::error(&e)
    }
  }
}

async fn syncuser_result(
  state: &AppState,
  body: Result<Json<SyncRequest>, JsonRejection>
) -> Result<String, HandlerError> {
  let Json(SyncRequest {
    request: ProvisioningRequest {
      access_token,
      token_response
    },
    existing_user
  }) = body?;

  let claims = decode_id_token(&token_response.id_token)?;

  let drifted = drifted_fields(&existing_user, &claims);

  if drifted.is_empty() {
    info!(username = %existing_user.username, "Not syncing user as no changes detected");

    return Ok(existing_user.username)
  }

  info!(username = %existing_user.username, ?drifted, "Syncing user, changes detected");

  let patched = state.directory
    .patch_user(
      &access_token,
      &existing_user.company_id,
      &existing_user.id,
      &UserPatch {
        email: claims.email,
        first_name: claims.given_name,
        last_name: claims.family_name,
      }
    )
    .await?;

  info!(username = %patched.username, "Updated user");

  Ok(patched.username)
}

/// Names of the user fields that no longer match the IDP's claims.
///
/// A field OrderCloud holds as `NOT_AVAILABLE` was never set and is not
/// considered drifted, whatever the claim says. A null field drifts once
/// the claim is provided.
fn drifted_fields(
  existing: &DirectoryUser,
  claims: &IdentityClaims
) -> Vec<&'static str> {
  [
    ("Email", &existing.email, &claims.email),
    ("FirstName", &existing.first_name, &claims.given_name),
    ("LastName", &existing.last_name, &claims.family_name),
  ].into_iter()
    .filter(|&(_, current, claim)| current.drifted_from(claim.as_deref()))
    .map(|(field, ..)| field)
    .collect()
}
