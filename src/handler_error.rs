use axum::extract::rejection::JsonRejection;

use crate::{claims::DecodeError, directory::DirectoryError};

/// Everything that can go wrong while handling an integration event.
/// All of it is reported to OrderCloud in the response body.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum HandlerError {
  // Request body
  Body(#[from] JsonRejection),
  // IDP id_token
  Decode(#[from] DecodeError),
  // OrderCloud
  Directory(#[from] DirectoryError),
}

impl HandlerError {
  /// The `ErrorMessage` OrderCloud displays to the user.
  ///
  /// OrderCloud's `Errors` list is forwarded as the JSON it was sent as,
  /// everything else as its description.
  pub fn error_message(&self) -> String {
    match self {
      HandlerError::Directory(DirectoryError::Api { errors, .. }) =>
        serde_json::to_string(errors)
          .unwrap_or_else(|_| self.to_string()),
      _ => self.to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use reqwest::StatusCode;

  use super::*;

  #[test]
  fn api_errors_are_forwarded_as_sent() {
    let errors: Vec<serde_json::Value> = serde_json::from_str(
      r#"[{"ErrorCode":"IdExists","Message":"ID already exists.","Data":{"ObjectType":"User","ObjectID":"jdoe"}},{"ErrorCode":"Required","Message":"Email is required.","Data":null,"Hint":"x"},{"ErrorCode":"Unknown"}]"#
    ).unwrap();

    let err = HandlerError::from(DirectoryError::Api {
      status: StatusCode::CONFLICT,
      errors
    });

    assert_eq!(
      err.error_message(),
      r#"[{"ErrorCode":"IdExists","Message":"ID already exists.","Data":{"ObjectType":"User","ObjectID":"jdoe"}},{"ErrorCode":"Required","Message":"Email is required.","Data":null,"Hint":"x"},{"ErrorCode":"Unknown"}]"#
    );
  }

  #[test]
  fn other_errors_use_their_description() {
    let err = HandlerError::from(DecodeError::Segments(1));

    assert_eq!(err.error_message(), "Invalid id_token: expected 3 segments, found 1");
  }
}
