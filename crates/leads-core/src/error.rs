//! Error types for `leads-core`.

use thiserror::Error;

/// The domain failures every backend reports the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A required field was missing or empty.
  #[error("{0}")]
  Validation(String),

  /// Another live lead already uses this email address.
  #[error("email already exists: {0}")]
  DuplicateEmail(String),

  #[error("lead not found: {0}")]
  NotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
