//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use leads_core::lead::{Lead, LeadPatch, LeadStatus};

use crate::{
  client::ApiClient,
  form::{Form, FormKind},
};

// ─── Actions ──────────────────────────────────────────────────────────────────

/// A row action applied to the lead under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  View,
  Edit,
  Delete,
  SetStatus(LeadStatus),
}

impl Action {
  /// The action bound to `code` in the table, if any.
  pub fn from_key(code: KeyCode) -> Option<Self> {
    match code {
      KeyCode::Enter | KeyCode::Char('v') => Some(Self::View),
      KeyCode::Char('e') => Some(Self::Edit),
      KeyCode::Char('d') | KeyCode::Delete => Some(Self::Delete),
      KeyCode::Char(c @ '1'..='4') => {
        let idx = c as usize - '1' as usize;
        Some(Self::SetStatus(LeadStatus::ALL[idx]))
      }
      _ => None,
    }
  }
}

/// The status filter after `current` when cycling with `f`:
/// all → New → Contacted → Qualified → Lost → all.
pub fn next_status_filter(current: Option<LeadStatus>) -> Option<LeadStatus> {
  match current {
    None => Some(LeadStatus::ALL[0]),
    Some(s) => {
      let idx = LeadStatus::ALL.iter().position(|x| *x == s).unwrap_or(0);
      LeadStatus::ALL.get(idx + 1).copied()
    }
  }
}

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  /// Navigating the table.
  Normal,
  /// Typing into the search box.
  Search,
  /// A create or edit popup has focus.
  Form(Form),
  /// Waiting for `y` to delete the lead.
  ConfirmDelete { id: String, name: String },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: Mode,

  /// Leads returned by the last list call, in server order.
  pub leads: Vec<Lead>,

  /// Search text sent as `q`.
  pub search: String,

  /// Status sent as `status`; `None` shows every lead.
  pub status_filter: Option<LeadStatus>,

  /// Cursor position within `leads`.
  pub cursor: usize,

  /// Lead shown in the detail pane (fetched fresh on View).
  pub detail: Option<Lead>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty lead list.
  pub fn new(client: ApiClient) -> Self {
    Self {
      mode: Mode::Normal,
      leads: Vec::new(),
      search: String::new(),
      status_filter: None,
      cursor: 0,
      detail: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch leads matching the current filters.
  pub async fn load(&mut self) -> anyhow::Result<()> {
    let leads = self.client.list(&self.search, self.status_filter).await?;
    self.leads = leads;
    if self.cursor >= self.leads.len() {
      self.cursor = self.leads.len().saturating_sub(1);
    }
    // Keep the detail pane in sync with the refreshed rows.
    if let Some(shown) = &self.detail {
      self.detail = self.leads.iter().find(|l| l.id == shown.id).cloned();
    }
    Ok(())
  }

  /// Surface a failed request in the status bar.
  fn report(&mut self, result: anyhow::Result<()>) {
    if let Err(e) = result {
      self.status_msg = format!("Error: {e}");
    }
  }

  /// The lead under the cursor, if any.
  pub fn cursor_lead(&self) -> Option<&Lead> { self.leads.get(self.cursor) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Normal => return self.handle_normal_key(key).await,
      Mode::Search => self.handle_search_key(key).await,
      Mode::Form(_) => self.handle_form_key(key).await,
      Mode::ConfirmDelete { .. } => self.handle_confirm_key(key).await,
    }
    true
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    if let Some(action) = Action::from_key(key.code) {
      self.dispatch(action).await;
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.leads.len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Esc => self.detail = None,

      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.status_msg.clear();
      }
      KeyCode::Char('f') => {
        self.status_filter = next_status_filter(self.status_filter);
        self.cursor = 0;
        let result = self.load().await;
        self.report(result);
      }
      KeyCode::Char('r') => {
        let result = self.load().await;
        self.report(result);
      }
      KeyCode::Char('a') => {
        self.mode = Mode::Form(Form::create());
        self.status_msg.clear();
      }

      _ => {}
    }
    true
  }

  async fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search.clear();
        self.cursor = 0;
        let result = self.load().await;
        self.report(result);
      }
      KeyCode::Enter => {
        self.mode = Mode::Normal;
        self.cursor = 0;
        let result = self.load().await;
        self.report(result);
      }
      KeyCode::Backspace => {
        self.search.pop();
      }
      KeyCode::Char(c) => self.search.push(c),
      _ => {}
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let Mode::Form(form) = &mut self.mode else {
      return;
    };
    match key.code {
      KeyCode::Esc => self.mode = Mode::Normal,
      KeyCode::Tab | KeyCode::Down => form.next(),
      KeyCode::BackTab | KeyCode::Up => form.prev(),
      KeyCode::Right => form.cycle_status(true),
      KeyCode::Left => form.cycle_status(false),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Char(c) => form.input(c),
      KeyCode::Enter => {
        let form = form.clone();
        self.submit(form).await;
      }
      _ => {}
    }
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    let Mode::ConfirmDelete { id, .. } = std::mem::replace(&mut self.mode, Mode::Normal)
    else {
      return;
    };
    if key.code != KeyCode::Char('y') {
      self.status_msg = "Delete cancelled".into();
      return;
    }
    let result = self.delete(&id).await;
    self.report(result);
  }

  // ── Action dispatch ───────────────────────────────────────────────────────

  /// Apply `action` to the lead under the cursor.
  pub async fn dispatch(&mut self, action: Action) {
    let Some(lead) = self.cursor_lead().cloned() else {
      return;
    };
    match action {
      Action::View => {
        let result = self.view(&lead.id).await;
        self.report(result);
      }
      Action::Edit => {
        let result = self.edit(&lead.id).await;
        self.report(result);
      }
      Action::Delete => {
        self.mode = Mode::ConfirmDelete {
          id:   lead.id,
          name: lead.name,
        };
      }
      Action::SetStatus(status) => {
        let result = self.set_status(&lead.id, status).await;
        self.report(result);
      }
    }
  }

  async fn view(&mut self, id: &str) -> anyhow::Result<()> {
    self.detail = Some(self.client.get(id).await?);
    Ok(())
  }

  async fn edit(&mut self, id: &str) -> anyhow::Result<()> {
    let lead = self.client.get(id).await?;
    self.mode = Mode::Form(Form::edit(&lead));
    Ok(())
  }

  async fn set_status(&mut self, id: &str, status: LeadStatus) -> anyhow::Result<()> {
    let lead = self.client.update(id, &LeadPatch::status(status)).await?;
    self.status_msg = format!("{} → {}", lead.name, lead.status);
    self.load().await
  }

  async fn delete(&mut self, id: &str) -> anyhow::Result<()> {
    let deleted = self.client.delete(id).await?;
    self.status_msg = format!("Lead deleted successfully ({})", deleted.name);
    self.load().await
  }

  /// Send `form`; on failure the form stays open with the server's message.
  async fn submit(&mut self, form: Form) {
    let result = match &form.kind {
      FormKind::Create => self
        .client
        .create(&form.create_request())
        .await
        .map(|lead| format!("Created {}", lead.name)),
      FormKind::Edit { id } => self
        .client
        .update(id, &form.patch())
        .await
        .map(|_| "Lead successfully updated!".to_owned()),
    };

    match result {
      Ok(msg) => {
        self.mode = Mode::Normal;
        self.status_msg = msg;
        let result = self.load().await;
        self.report(result);
      }
      Err(e) => {
        self.mode = Mode::Form(form);
        self.status_msg = format!("Error: {e}");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use leads_core::lead::NewLead;

  use super::*;
  use crate::client::ApiConfig;

  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:1".into(),
    })
    .unwrap();
    App::new(client)
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn lead(id: &str, name: &str) -> Lead {
    Lead::from_new(NewLead::new(name, format!("{id}@x.com")), id.into(), Utc::now())
  }

  #[test]
  fn keys_map_to_actions() {
    assert_eq!(Action::from_key(KeyCode::Enter), Some(Action::View));
    assert_eq!(Action::from_key(KeyCode::Char('e')), Some(Action::Edit));
    assert_eq!(Action::from_key(KeyCode::Char('d')), Some(Action::Delete));
    assert_eq!(
      Action::from_key(KeyCode::Char('1')),
      Some(Action::SetStatus(LeadStatus::New))
    );
    assert_eq!(
      Action::from_key(KeyCode::Char('4')),
      Some(Action::SetStatus(LeadStatus::Lost))
    );
    assert_eq!(Action::from_key(KeyCode::Char('5')), None);
    assert_eq!(Action::from_key(KeyCode::Char('q')), None);
  }

  #[test]
  fn status_filter_cycles_back_to_all() {
    let mut filter = None;
    let mut seen = Vec::new();
    for _ in 0..5 {
      filter = next_status_filter(filter);
      seen.push(filter);
    }
    assert_eq!(seen, [
      Some(LeadStatus::New),
      Some(LeadStatus::Contacted),
      Some(LeadStatus::Qualified),
      Some(LeadStatus::Lost),
      None,
    ]);
  }

  #[tokio::test]
  async fn cursor_stays_in_bounds() {
    let mut app = app();
    app.leads = vec![lead("1", "Ada"), lead("2", "Bob")];

    assert!(app.handle_key(key(KeyCode::Up)).await);
    assert_eq!(app.cursor, 0);
    app.handle_key(key(KeyCode::Down)).await;
    app.handle_key(key(KeyCode::Down)).await;
    assert_eq!(app.cursor, 1);
    assert_eq!(app.cursor_lead().unwrap().name, "Bob");
  }

  #[tokio::test]
  async fn delete_asks_for_confirmation_and_can_be_cancelled() {
    let mut app = app();
    app.leads = vec![lead("1", "Ada")];

    app.handle_key(key(KeyCode::Char('d'))).await;
    assert_eq!(app.mode, Mode::ConfirmDelete {
      id:   "1".into(),
      name: "Ada".into(),
    });

    app.handle_key(key(KeyCode::Char('n'))).await;
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.leads.len(), 1);
  }

  #[tokio::test]
  async fn create_form_opens_edits_and_cancels() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await;
    app.handle_key(key(KeyCode::Char('q'))).await;
    let Mode::Form(form) = &app.mode else {
      panic!("expected form, got {:?}", app.mode);
    };
    // `q` is text inside a form, not quit.
    assert_eq!(form.fields[0].value, "q");

    assert!(app.handle_key(key(KeyCode::Esc)).await);
    assert_eq!(app.mode, Mode::Normal);
  }

  #[tokio::test]
  async fn search_collects_text() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('/'))).await;
    for c in "acme".chars() {
      app.handle_key(key(KeyCode::Char(c))).await;
    }
    app.handle_key(key(KeyCode::Backspace)).await;
    assert_eq!(app.mode, Mode::Search);
    assert_eq!(app.search, "acm");
  }

  #[tokio::test]
  async fn actions_on_empty_table_do_nothing() {
    let mut app = app();
    app.dispatch(Action::Delete).await;
    assert_eq!(app.mode, Mode::Normal);
    assert!(app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn failed_reload_lands_in_status_bar() {
    let mut app = app();
    assert!(app.handle_key(key(KeyCode::Char('r'))).await);
    assert!(app.status_msg.starts_with("Error: "), "{}", app.status_msg);
    assert_eq!(app.mode, Mode::Normal);
  }

  #[tokio::test]
  async fn q_quits_from_table() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await);
  }
}
