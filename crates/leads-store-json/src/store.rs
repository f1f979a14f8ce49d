//! [`JsonFileStore`], the JSON-file implementation of [`LeadStore`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use leads_core::{
  lead::{Lead, LeadPatch, NewLead, assign_id, creation_instant, highest_id},
  query::LeadQuery,
  store::LeadStore,
};
use tokio::sync::RwLock;

use crate::{Error, Result, document};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct State {
  /// Insertion order is preserved; `list` returns leads in this order.
  leads:   Vec<Lead>,
  /// Highest numeric id handed out so far, including deleted leads.
  last_id: Option<i64>,
}

impl State {
  fn new(leads: Vec<Lead>) -> Self {
    let last_id = highest_id(&leads);
    Self { leads, last_id }
  }

  fn position(&self, id: &str) -> Option<usize> {
    self.leads.iter().position(|l| l.id == id)
  }
}

struct Inner {
  /// `None` for in-memory stores.
  path:  Option<PathBuf>,
  state: RwLock<State>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A leads store backed by a single JSON file.
///
/// Cloning is cheap; all clones share the same collection and lock.
#[derive(Clone)]
pub struct JsonFileStore {
  inner: Arc<Inner>,
}

impl JsonFileStore {
  /// Open (or prepare to create) a store at `path`. The file is created by
  /// the first mutation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let leads = document::load(&path).await?;
    tracing::debug!(path = %path.display(), count = leads.len(), "opened lead store");
    Ok(Self::from_parts(Some(path), leads))
  }

  /// Open a store that never touches disk, for tests.
  pub fn open_in_memory() -> Self { Self::from_parts(None, Vec::new()) }

  /// The backing file, if any.
  pub fn path(&self) -> Option<&Path> { self.inner.path.as_deref() }

  fn from_parts(path: Option<PathBuf>, leads: Vec<Lead>) -> Self {
    Self {
      inner: Arc::new(Inner {
        path,
        state: RwLock::new(State::new(leads)),
      }),
    }
  }

  /// Run `operation` against a copy of the collection, persist the copy, then
  /// commit it. The write lock is held throughout, so concurrent mutations
  /// are serialised and a failed operation or write changes nothing.
  async fn mutate<T, F>(&self, operation: F) -> Result<T>
  where
    F: FnOnce(&mut State) -> Result<T> + Send,
    T: Send,
  {
    let mut state = self.inner.state.write().await;
    let mut next = state.clone();
    let output = operation(&mut next)?;

    if let Some(path) = &self.inner.path {
      document::persist(path, &next.leads).await?;
    }

    *state = next;
    Ok(output)
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for JsonFileStore {
  type Error = Error;

  async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
    let state = self.inner.state.read().await;
    Ok(query.filter(&state.leads).cloned().collect())
  }

  async fn get(&self, id: &str) -> Result<Option<Lead>> {
    let state = self.inner.state.read().await;
    Ok(state.position(id).map(|idx| state.leads[idx].clone()))
  }

  async fn create(&self, input: NewLead) -> Result<Lead> {
    self
      .mutate(move |state| {
        input.validate(&state.leads)?;

        let created_at = creation_instant();
        let id = assign_id(state.last_id, created_at);
        state.last_id = Some(id);

        let lead = Lead::from_new(input, id.to_string(), created_at);
        state.leads.push(lead.clone());
        Ok(lead)
      })
      .await
  }

  async fn update(&self, id: &str, patch: LeadPatch) -> Result<Lead> {
    self
      .mutate(move |state| {
        let idx = state
          .position(id)
          .ok_or_else(|| leads_core::Error::NotFound(id.to_owned()))?;
        let lead = &mut state.leads[idx];
        lead.apply(patch);
        Ok(lead.clone())
      })
      .await
  }

  async fn delete(&self, id: &str) -> Result<Lead> {
    self
      .mutate(move |state| {
        let idx = state
          .position(id)
          .ok_or_else(|| leads_core::Error::NotFound(id.to_owned()))?;
        Ok(state.leads.remove(idx))
      })
      .await
  }
}
