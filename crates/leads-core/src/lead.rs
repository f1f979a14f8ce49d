//! Lead types, the sole entity of the store.
//!
//! A lead is created once with a store-assigned `id` and `createdAt`. After
//! that only the fields named in [`LeadPatch`] can change.

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a lead sits in the sales pipeline.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum LeadStatus {
  #[default]
  New,
  Contacted,
  Qualified,
  Lost,
}

impl LeadStatus {
  /// Every status, in pipeline order.
  pub const ALL: [LeadStatus; 4] =
    [Self::New, Self::Contacted, Self::Qualified, Self::Lost];
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// A persisted lead record. Field names on the wire match the JSON document
/// on disk (`createdAt` is the only camel-cased one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id:         String,
  pub name:       String,
  pub email:      String,
  #[serde(default)]
  pub company:    String,
  #[serde(default)]
  pub source:     String,
  #[serde(default)]
  pub notes:      String,
  /// Read leniently: documents on disk may hold any casing or an unknown
  /// string, which reads as [`LeadStatus::New`].
  #[serde(default, deserialize_with = "lenient_status")]
  pub status:     LeadStatus,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

fn lenient_status<'de, D>(deserializer: D) -> Result<LeadStatus, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(deserializer)?;
  Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

impl Lead {
  /// Build the record for a validated [`NewLead`]. The status always starts
  /// at [`LeadStatus::New`].
  pub fn from_new(input: NewLead, id: String, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      name: input.name,
      email: input.email,
      company: input.company.unwrap_or_default(),
      source: input.source.unwrap_or_default(),
      notes: input.notes.unwrap_or_default(),
      status: LeadStatus::New,
      created_at,
    }
  }

  /// Apply the whitelisted fields present in `patch`; absent fields are left
  /// alone.
  pub fn apply(&mut self, patch: LeadPatch) {
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(notes) = patch.notes {
      self.notes = notes;
    }
    if let Some(company) = patch.company {
      self.company = company;
    }
  }
}

// ─── NewLead ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::LeadStore::create`].
/// `id`, `createdAt` and `status` are always set by the store.
#[derive(Debug, Clone, Default)]
pub struct NewLead {
  pub name:    String,
  pub email:   String,
  pub company: Option<String>,
  pub source:  Option<String>,
  pub notes:   Option<String>,
}

impl NewLead {
  /// Convenience constructor with all optional fields unset.
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      ..Self::default()
    }
  }

  /// Check presence of the required fields and uniqueness of `email` against
  /// the live collection.
  pub fn validate(&self, existing: &[Lead]) -> Result<()> {
    if self.name.is_empty() || self.email.is_empty() {
      return Err(Error::Validation("Name and email are required".into()));
    }
    if existing.iter().any(|lead| lead.email == self.email) {
      return Err(Error::DuplicateEmail(self.email.clone()));
    }
    Ok(())
  }
}

// ─── LeadPatch ───────────────────────────────────────────────────────────────

/// A partial update. Only these three fields are mutable after creation;
/// any other key in a request body is dropped during deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:  Option<LeadStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
}

impl LeadPatch {
  pub fn status(status: LeadStatus) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The creation instant, truncated to the millisecond precision persisted on
/// disk.
pub fn creation_instant() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

/// Derive the numeric id for a lead created at `created_at`.
///
/// The id is the creation time in milliseconds, bumped past `last_issued` when
/// the clock has not advanced since the previous creation.
pub fn assign_id(last_issued: Option<i64>, created_at: DateTime<Utc>) -> i64 {
  let stamp = created_at.timestamp_millis();
  match last_issued {
    Some(last) if last >= stamp => last.saturating_add(1),
    _ => stamp,
  }
}

/// The highest numeric id in `leads`, if any id is numeric.
pub fn highest_id(leads: &[Lead]) -> Option<i64> {
  leads.iter().filter_map(|l| l.id.parse::<i64>().ok()).max()
}
