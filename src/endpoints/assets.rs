use std::{io, path::{Path, PathBuf}};

use axum::{extract::State, http::{header, StatusCode, Uri}, response::{IntoResponse, Response}};
use percent_encoding::percent_decode_str;
use tracing::error;

use crate::state::AppState;

/// Axum handler function serving the single page application.
///
/// Placeholders in text files are replaced with the configured values
/// before they are sent.
pub async fn assets(State(state): State<AppState>, uri: Uri) -> Response {
  let Some(path) = resolve(&state.static_root, uri.path()) else {
    return StatusCode::NOT_FOUND.into_response()
  };

  match asset_result(&state, path).await {
    Ok(ok) => ok,
    Err(e) if e.kind() == io::ErrorKind::NotFound =>
      StatusCode::NOT_FOUND.into_response(),
    Err(e) => {
      error!("Could not serve {path}: {e}", path = uri.path());

      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

async fn asset_result(state: &AppState, mut path: PathBuf) -> Result<Response, io::Error> {
  if tokio::fs::metadata(&path).await?.is_dir() {
    path.push("index.html");
  }

  let extension = path.extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();

  let (content_type, is_text) = content_type(&extension);

  let body = tokio::fs::read(&path).await?;

  if !is_text {
    return Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
  }

  let body = substitute(
    String::from_utf8_lossy(&body).into_owned(),
    &state.substitutions
  );

  Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Map a percent-encoded request path onto a file below `root`.
/// Returns `None` for paths trying to leave `root`.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
  let mut path = root.to_path_buf();

  for segment in request_path.split('/').filter(|s| !s.is_empty()) {
    // checked after decoding, `%2e%2e` is `..`
    let segment = percent_decode_str(segment).decode_utf8().ok()?;

    if segment == "." || segment == ".." || segment.contains(['/', '\\', ':', '\0']) {
      return None
    }

    path.push(&*segment);
  }

  Some(path)
}

fn substitute(mut content: String, substitutions: &[(&'static str, String)]) -> String {
  for (placeholder, value) in substitutions {
    if content.contains(placeholder) {
      content = content.replace(placeholder, value);
    }
  }

  content
}

/// Content type of a file extension, and whether placeholders
/// are substituted in it.
fn content_type(extension: &str) -> (&'static str, bool) {
  match extension {
    "html" | "htm" => ("text/html; charset=utf-8", true),
    "js" | "mjs" => ("text/javascript; charset=utf-8", true),
    "css" => ("text/css; charset=utf-8", true),
    "json" | "map" => ("application/json", true),
    "txt" => ("text/plain; charset=utf-8", true),
    "svg" => ("image/svg+xml", true),
    "xml" => ("application/xml", true),
    "png" => ("image/png", false),
    "jpg" | "jpeg" => ("image/jpeg", false),
    "gif" => ("image/gif", false),
    "webp" => ("image/webp", false),
    "ico" => ("image/x-icon", false),
    "woff" => ("font/woff", false),
    "woff2" => ("font/woff2", false),
    "ttf" => ("font/ttf", false),
    "wasm" => ("application/wasm", false),
    _ => ("application/octet-stream", false),
  }
}
