use base64::{engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig}, alphabet::URL_SAFE, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// base64url which tolerates (but doesn't require) trailing padding
const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
  &URL_SAFE,
  GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent)
);

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
  #[error("Invalid id_token: expected 3 segments, found {0}")]
  Segments(usize),
  #[error("Invalid id_token: payload is not base64url ({0})")]
  Base64(#[from] base64::DecodeError),
  #[error("Invalid id_token: payload is not a JSON object")]
  NotAnObject,
  #[error("Invalid id_token: {0}")]
  Json(#[from] serde_json::Error),
}

/// Claims describing the user who logged in with the IDP.
/// Every claim is optional, IDPs are free to leave any of them out.
///
/// Source: https://openid.net/specs/openid-connect-core-1_0.html#StandardClaims
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct IdentityClaims {
  pub email: Option<String>,
  pub given_name: Option<String>,
  pub family_name: Option<String>,
  // informational, never validated. Unusable values are dropped.
  #[serde(default, deserialize_with = "lenient_string")]
  pub sub: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub iss: Option<String>,
  #[serde(default, deserialize_with = "lenient_numeric_date")]
  pub iat: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "lenient_numeric_date")]
  pub exp: Option<DateTime<Utc>>,
}

fn lenient_string<'de, D: Deserializer<'de>>(
  deserializer: D
) -> Result<Option<String>, D::Error> {
  Ok(
    Option::<serde_json::Value>::deserialize(deserializer)?
      .and_then(|value| value.as_str().map(str::to_string))
  )
}

/// Seconds since the epoch, which may be fractional.
///
/// Source: https://www.rfc-editor.org/rfc/rfc7519#section-2 (NumericDate)
fn lenient_numeric_date<'de, D: Deserializer<'de>>(
  deserializer: D
) -> Result<Option<DateTime<Utc>>, D::Error> {
  Ok(
    Option::<serde_json::Value>::deserialize(deserializer)?
      .and_then(|value| value.as_f64())
      .filter(|seconds| seconds.is_finite())
      .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds.trunc() as i64, 0))
  )
}

/// Decode the claims of an IDP issued id_token.
///
/// The signature is NOT verified. OrderCloud already validated the
/// token before calling the integration event.
pub fn decode_id_token(id_token: &str) -> Result<IdentityClaims, DecodeError> {
  let segments = id_token.split('.').collect::<Vec<_>>();

  let [_header, payload, _signature] = segments[..] else {
    return Err(DecodeError::Segments(segments.len()))
  };

  let payload: serde_json::Value = serde_json::from_slice(
    &URL_SAFE_ANY_PAD.decode(payload)?
  )?;

  // derived struct impls also accept JSON arrays
  if !payload.is_object() {
    return Err(DecodeError::NotAnObject)
  }

  Ok(serde_json::from_value(payload)?)
}
