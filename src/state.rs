use std::{path::PathBuf, sync::Arc};

use crate::{config::Config, directory::DirectoryClient};

/// Shared by every request. Immutable, so nothing one request does
/// is visible to another.
#[derive(Clone)]
pub struct AppState {
  pub directory: Arc<dyn DirectoryClient>,
  pub buyer_id: Arc<str>,
  pub static_root: Arc<PathBuf>,
  /// (placeholder, value) pairs injected into static files
  pub substitutions: Arc<[(&'static str, String)]>,
}

impl AppState {
  pub fn new(config: &Config, directory: Arc<dyn DirectoryClient>) -> Self {
    AppState {
      directory,
      buyer_id: config.buyer_id.as_str().into(),
      static_root: Arc::new(config.static_root.clone()),
      substitutions: config.substitutions().into(),
    }
  }
}
