//! Reading and writing the on-disk JSON document.
//!
//! The document is a bare array of leads with no version header. A missing or
//! blank file is an empty collection.

use std::{
  ffi::OsString,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use leads_core::lead::Lead;
use uuid::Uuid;

use crate::{Error, Result};

/// Load the collection stored at `path`.
pub(crate) async fn load(path: &Path) -> Result<Vec<Lead>> {
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(Error::io(path, e)),
  };

  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(Vec::new());
  }

  Ok(serde_json::from_slice(&bytes)?)
}

/// Replace the document at `path` with `leads`.
///
/// The payload goes to a sibling temp file first and is renamed into place,
/// so readers never observe a partially written document.
pub(crate) async fn persist(path: &Path, leads: &[Lead]) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .map_err(|e| Error::io(parent, e))?;
  }

  let payload = serde_json::to_vec_pretty(leads)?;
  let temp = temp_path(path);

  tokio::fs::write(&temp, payload)
    .await
    .map_err(|e| Error::io(&temp, e))?;

  if let Err(e) = tokio::fs::rename(&temp, path).await {
    tokio::fs::remove_file(&temp).await.ok();
    return Err(Error::io(path, e));
  }

  tracing::debug!(path = %path.display(), count = leads.len(), "persisted leads");
  Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
  let mut name = path
    .file_name()
    .map(OsString::from)
    .unwrap_or_else(|| OsString::from("leads.json"));
  name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
  path.with_file_name(name)
}
