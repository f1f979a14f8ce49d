//! Tests for `JsonFileStore`, in memory and against a temp directory.

use std::collections::HashSet;

use leads_core::{
  Error as CoreError,
  lead::{LeadPatch, LeadStatus, NewLead},
  query::LeadQuery,
  store::LeadStore,
};

use crate::{Error, JsonFileStore};

fn store() -> JsonFileStore { JsonFileStore::open_in_memory() }

fn lead_at(name: &str, email: &str, company: &str) -> NewLead {
  let mut input = NewLead::new(name, email);
  input.company = Some(company.into());
  input
}

async fn all(s: &JsonFileStore) -> Vec<leads_core::lead::Lead> {
  s.list(&LeadQuery::default()).await.unwrap()
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get() {
  let s = store();

  let lead = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();
  assert_eq!(lead.status, LeadStatus::New);
  assert!(!lead.id.is_empty());
  assert_eq!(lead.company, "");

  let fetched = s.get(&lead.id).await.unwrap();
  assert_eq!(fetched, Some(lead));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store();
  assert!(s.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn create_with_empty_required_field_leaves_collection_untouched() {
  let s = store();
  s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();

  for input in [NewLead::new("", "b@x.com"), NewLead::new("Bob", "")] {
    let err = s.create(input).await.unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::Validation(_))), "{err}");
  }

  assert_eq!(all(&s).await.len(), 1);
}

#[tokio::test]
async fn duplicate_email_conflicts_and_adds_only_one() {
  let s = store();
  s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();

  let err = s
    .create(NewLead::new("Ada Again", "ada@x.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateEmail(_))));
  assert_eq!(all(&s).await.len(), 1);
}

#[tokio::test]
async fn ids_are_unique_for_rapid_creates() {
  let s = store();
  let mut ids = HashSet::new();
  for i in 0..50 {
    let lead = s
      .create(NewLead::new("Lead", format!("lead{i}@x.com")))
      .await
      .unwrap();
    assert!(ids.insert(lead.id));
  }
}

#[tokio::test]
async fn deleted_ids_are_not_reissued() {
  let s = store();
  let first = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();
  s.delete(&first.id).await.unwrap();

  let second = s.create(NewLead::new("Bob", "bob@x.com")).await.unwrap();
  assert_ne!(first.id, second.id);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_text_and_status_in_insertion_order() {
  let s = store();
  let a = s.create(lead_at("Ada", "ada@x.com", "Acme")).await.unwrap();
  let b = s.create(lead_at("Bob", "bob@x.com", "Initech")).await.unwrap();
  let c = s.create(lead_at("ACME buyer", "c@x.com", "")).await.unwrap();

  s.update(&b.id, LeadPatch::status(LeadStatus::Lost))
    .await
    .unwrap();

  let ids = |leads: Vec<leads_core::lead::Lead>| {
    leads.into_iter().map(|l| l.id).collect::<Vec<_>>()
  };

  let acme = s.list(&LeadQuery::new(Some("acme"), None)).await.unwrap();
  assert_eq!(ids(acme), [a.id.clone(), c.id.clone()]);

  let lost = s.list(&LeadQuery::new(None, Some("LOST"))).await.unwrap();
  assert_eq!(ids(lost), [b.id.clone()]);

  let both = s
    .list(&LeadQuery::new(Some("acme"), Some("new")))
    .await
    .unwrap();
  assert_eq!(both.len(), 2);

  assert_eq!(ids(all(&s).await), [a.id, b.id, c.id]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_status_leaves_other_fields_unchanged() {
  let s = store();
  let mut input = lead_at("Ada", "ada@x.com", "Acme");
  input.source = Some("referral".into());
  input.notes = Some("met at expo".into());
  let before = s.create(input).await.unwrap();

  let updated = s
    .update(&before.id, LeadPatch::status(LeadStatus::Qualified))
    .await
    .unwrap();
  assert_eq!(updated.status, LeadStatus::Qualified);

  let after = s.get(&before.id).await.unwrap().unwrap();
  assert_eq!(after, updated);
  assert_eq!(after.name, before.name);
  assert_eq!(after.email, before.email);
  assert_eq!(after.company, before.company);
  assert_eq!(after.source, before.source);
  assert_eq!(after.notes, before.notes);
  assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn update_company_and_notes() {
  let s = store();
  let lead = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();

  let updated = s
    .update(&lead.id, LeadPatch {
      company: Some("Acme".into()),
      notes:   Some("hot".into()),
      status:  None,
    })
    .await
    .unwrap();
  assert_eq!(updated.company, "Acme");
  assert_eq!(updated.notes, "hot");
  assert_eq!(updated.status, LeadStatus::New);
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store();
  let err = s
    .update("nope", LeadPatch::status(LeadStatus::Lost))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotFound(id)) if id == "nope"));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_returns_removed_record() {
  let s = store();
  let lead = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();

  let deleted = s.delete(&lead.id).await.unwrap();
  assert_eq!(deleted, lead);
  assert!(s.get(&lead.id).await.unwrap().is_none());

  let err = s.delete(&lead.id).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotFound(_))));
}

#[tokio::test]
async fn deleted_email_can_be_reused() {
  let s = store();
  let lead = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();
  s.delete(&lead.id).await.unwrap();
  s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_file_opens_empty_and_is_created_on_first_write() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("leads.json");

  let s = JsonFileStore::open(&path).await.unwrap();
  assert!(all(&s).await.is_empty());
  assert!(!path.exists());

  s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();
  assert!(path.exists());
}

#[tokio::test]
async fn reopen_yields_same_collection() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");

  let s = JsonFileStore::open(&path).await.unwrap();
  let a = s.create(lead_at("Ada", "ada@x.com", "Acme")).await.unwrap();
  let b = s.create(NewLead::new("Bob", "bob@x.com")).await.unwrap();
  let c = s.create(NewLead::new("Cy", "cy@x.com")).await.unwrap();
  s.update(&a.id, LeadPatch::status(LeadStatus::Contacted))
    .await
    .unwrap();
  s.delete(&b.id).await.unwrap();
  let expected = all(&s).await;
  drop(s);

  let reopened = JsonFileStore::open(&path).await.unwrap();
  let leads = all(&reopened).await;
  assert_eq!(leads, expected);
  assert_eq!(leads[0].status, LeadStatus::Contacted);
  assert_eq!(leads[1].id, c.id);
}

#[tokio::test]
async fn document_is_a_pretty_json_array() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");

  let s = JsonFileStore::open(&path).await.unwrap();
  let lead = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap();

  let raw = std::fs::read_to_string(&path).unwrap();
  assert!(raw.starts_with("[\n  {"), "{raw}");

  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  let entry = &value[0];
  assert_eq!(entry["id"], lead.id.as_str());
  assert_eq!(entry["status"], "New");
  assert!(entry["createdAt"].is_string());
  assert_eq!(entry["company"], "");
}

#[tokio::test]
async fn loads_document_written_by_other_tools() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");
  std::fs::write(
    &path,
    r#"[
  {
    "id": "1700000000123",
    "name": "Ada",
    "email": "ada@x.com",
    "company": "Acme",
    "source": "",
    "notes": "",
    "status": "Qualified",
    "createdAt": "2023-11-14T22:13:20.123Z"
  }
]"#,
  )
  .unwrap();

  let s = JsonFileStore::open(&path).await.unwrap();
  let lead = s.get("1700000000123").await.unwrap().unwrap();
  assert_eq!(lead.status, LeadStatus::Qualified);
  assert_eq!(lead.company, "Acme");

  // New ids continue past the loaded ones.
  let next = s.create(NewLead::new("Bob", "bob@x.com")).await.unwrap();
  assert!(next.id.parse::<i64>().unwrap() > 1_700_000_000_123);
}

#[tokio::test]
async fn loads_statuses_outside_the_enum() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");
  std::fs::write(
    &path,
    r#"[
  {"id":"1","name":"Ada","email":"ada@x.com","company":"","source":"","notes":"","status":"lost","createdAt":"2023-11-14T22:13:20.123Z"},
  {"id":"2","name":"Bob","email":"bob@x.com","company":"","source":"","notes":"","status":"Won","createdAt":"2023-11-14T22:13:21.000Z"}
]"#,
  )
  .unwrap();

  let s = JsonFileStore::open(&path).await.unwrap();
  let ada = s.get("1").await.unwrap().unwrap();
  assert_eq!(ada.status, LeadStatus::Lost);
  let bob = s.get("2").await.unwrap().unwrap();
  assert_eq!(bob.status, LeadStatus::New);
}

#[tokio::test]
async fn corrupt_document_fails_to_open() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");
  std::fs::write(&path, "{ not json").unwrap();

  let result = JsonFileStore::open(&path).await;
  assert!(matches!(result, Err(Error::Json(_))));
}

#[tokio::test]
async fn failed_write_changes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  // A directory where the file should be makes the final rename fail.
  let path = dir.path().join("leads.json");
  let s = JsonFileStore::open(&path).await.unwrap();
  std::fs::create_dir(&path).unwrap();
  std::fs::write(path.join("occupied"), "x").unwrap();

  let err = s.create(NewLead::new("Ada", "ada@x.com")).await.unwrap_err();
  assert!(matches!(err, Error::Io { .. }), "{err}");
  assert!(all(&s).await.is_empty());
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_are_not_lost() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("leads.json");
  let s = JsonFileStore::open(&path).await.unwrap();

  let handles: Vec<_> = (0..32)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.create(NewLead::new(format!("Lead {i}"), format!("l{i}@x.com")))
          .await
          .unwrap()
      })
    })
    .collect();

  let mut ids = HashSet::new();
  for handle in handles {
    ids.insert(handle.await.unwrap().id);
  }
  assert_eq!(ids.len(), 32);

  let reopened = JsonFileStore::open(&path).await.unwrap();
  assert_eq!(all(&reopened).await.len(), 32);
}
