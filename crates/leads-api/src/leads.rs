//! Handlers for `/leads` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/leads` | Optional `?q=<text>&status=<status>` |
//! | `GET`    | `/leads/:id` | 404 if not found |
//! | `POST`   | `/leads` | Body: [`CreateBody`]; returns 201 + stored lead |
//! | `PATCH`  | `/leads/:id` | Body: [`LeadPatch`]; unknown keys are ignored; 404 checked first |
//! | `DELETE` | `/leads/:id` | Returns `{"message", "deleted"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequest, Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use leads_core::{
  lead::{Lead, LeadPatch, NewLead},
  query::LeadQuery,
  store::LeadStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `axum::Json` with rejections rendered as `{"error": ...}` 400s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Substring searched in name, company and id.
  pub q:      Option<String>,
  /// Exact status name, any case.
  pub status: Option<String>,
}

/// `GET /leads[?q=...][&status=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Lead>>, ApiError>
where
  S: LeadStore,
{
  let query = LeadQuery::new(params.q.as_deref(), params.status.as_deref());
  let leads = store
    .list(&query)
    .await
    .map_err(|e| ApiError::from_store(e, "Lead not found"))?;
  tracing::debug!(?query, count = leads.len(), "listed leads");
  Ok(Json(leads))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /leads/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore,
{
  let lead = store
    .get(&id)
    .await
    .map_err(|e| ApiError::from_store(e, "Lead not found"))?
    .ok_or_else(|| ApiError::NotFound("Lead not found".into()))?;
  Ok(Json(lead))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /leads`. Any `status` or `id` in the body is
/// ignored; the store assigns both.
#[derive(Debug, Deserialize, Default)]
pub struct CreateBody {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub company: Option<String>,
  pub source:  Option<String>,
  pub notes:   Option<String>,
}

impl From<CreateBody> for NewLead {
  fn from(b: CreateBody) -> Self {
    NewLead {
      name:    b.name.unwrap_or_default(),
      email:   b.email.unwrap_or_default(),
      company: b.company,
      source:  b.source,
      notes:   b.notes,
    }
  }
}

/// `POST /leads`: returns 201 + the stored [`Lead`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore,
{
  let lead = store
    .create(NewLead::from(body))
    .await
    .map_err(|e| ApiError::from_store(e, "Lead not found"))?;
  tracing::info!(id = %lead.id, "created lead");
  Ok((StatusCode::CREATED, Json(lead)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /leads/:id`: applies `status`, `notes` and `company` when present.
///
/// An unknown id is a 404 whatever the body holds. A request without a JSON
/// content type is an empty patch; a JSON body that fails to parse is a 400.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Result<Json<LeadPatch>, JsonRejection>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore,
{
  let exists = store
    .get(&id)
    .await
    .map_err(|e| ApiError::from_store(e, "Not found"))?
    .is_some();
  if !exists {
    return Err(ApiError::NotFound("Not found".into()));
  }

  let patch = match body {
    Ok(Json(patch)) => patch,
    Err(JsonRejection::MissingJsonContentType(_)) => LeadPatch::default(),
    Err(rejection) => return Err(rejection.into()),
  };

  let lead = store
    .update(&id, patch)
    .await
    .map_err(|e| ApiError::from_store(e, "Not found"))?;
  tracing::info!(%id, status = %lead.status, "updated lead");
  Ok(Json(lead))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub message: String,
  pub deleted: Lead,
}

/// `DELETE /leads/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError>
where
  S: LeadStore,
{
  let deleted = store
    .delete(&id)
    .await
    .map_err(|e| ApiError::from_store(e, "Lead not found"))?;
  tracing::info!(%id, "deleted lead");
  Ok(Json(DeleteResponse {
    message: "Lead deleted successfully".into(),
    deleted,
  }))
}
