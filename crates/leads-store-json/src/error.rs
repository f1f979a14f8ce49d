//! Error type for `leads-store-json`.

use std::path::PathBuf;

use leads_core::store::LeadStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] leads_core::Error),

  #[error("i/o error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }
}

impl LeadStoreError for Error {
  fn as_domain(&self) -> Option<&leads_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
