//! The `LeadStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `leads-store-json`).
//! Higher layers (`leads-api`, `leads-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  Error,
  lead::{Lead, LeadPatch, NewLead},
  query::LeadQuery,
};

/// Lets callers recover the domain failure behind a backend error, so the
/// HTTP layer can pick a status code without knowing the backend.
pub trait LeadStoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error, or `None` for infrastructure failures (I/O etc.).
  fn as_domain(&self) -> Option<&Error>;
}

impl LeadStoreError for Error {
  fn as_domain(&self) -> Option<&Error> { Some(self) }
}

/// Abstraction over a leads store backend.
///
/// Every mutation is atomic with respect to other calls on the same store:
/// the collection a mutation reads is the one it writes back.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  type Error: LeadStoreError;

  /// All leads matching `query`, in insertion order.
  fn list<'a>(
    &'a self,
    query: &'a LeadQuery,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + 'a;

  /// Retrieve a lead by id. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + 'a;

  /// Validate and persist a new lead. The store assigns `id` and `createdAt`
  /// and forces the status to `New`.
  ///
  /// Fails with [`Error::Validation`] when `name` or `email` is empty and
  /// with [`Error::DuplicateEmail`] when the email is taken.
  fn create(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// Apply a whitelisted partial update and return the updated lead.
  /// Fails with [`Error::NotFound`] for an unknown id.
  fn update<'a>(
    &'a self,
    id: &'a str,
    patch: LeadPatch,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + 'a;

  /// Remove a lead permanently and return the removed record.
  /// Fails with [`Error::NotFound`] for an unknown id.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + 'a;
}
