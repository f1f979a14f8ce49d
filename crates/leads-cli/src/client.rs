//! Async HTTP client wrapping the leads JSON API.

use anyhow::{Context, Result, anyhow};
use leads_core::lead::{Lead, LeadPatch, LeadStatus};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the leads API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Body of `POST /api/leads`. Empty strings are sent as-is so the server
/// gets to decide what is missing.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CreateRequest {
  pub name:    String,
  pub email:   String,
  pub company: String,
  pub source:  String,
  pub notes:   String,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct DeleteBody {
  deleted: Lead,
}

/// Async HTTP client for the leads JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Turn a non-2xx response into an error carrying the server's `error`
  /// message when it sent one.
  async fn check(what: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    match resp.json::<ErrorBody>().await {
      Ok(body) => Err(anyhow!("{}", body.error)),
      Err(_) => Err(anyhow!("{what} → {status}")),
    }
  }

  /// `GET /api/leads[?q=..][&status=..]`
  pub async fn list(&self, q: &str, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
    let mut params = Vec::new();
    if !q.is_empty() {
      params.push(("q", q.to_owned()));
    }
    if let Some(s) = status {
      params.push(("status", s.to_string()));
    }

    let resp = self
      .client
      .get(self.url("/leads"))
      .query(&params)
      .send()
      .await
      .context("GET /leads failed")?;
    Self::check("GET /leads", resp)
      .await?
      .json()
      .await
      .context("deserialising leads")
  }

  /// `GET /api/leads/:id`
  pub async fn get(&self, id: &str) -> Result<Lead> {
    let resp = self
      .client
      .get(self.url(&format!("/leads/{id}")))
      .send()
      .await
      .context("GET /leads/:id failed")?;
    Self::check("GET /leads/:id", resp)
      .await?
      .json()
      .await
      .context("deserialising lead")
  }

  /// `POST /api/leads`
  pub async fn create(&self, body: &CreateRequest) -> Result<Lead> {
    let resp = self
      .client
      .post(self.url("/leads"))
      .json(body)
      .send()
      .await
      .context("POST /leads failed")?;
    Self::check("POST /leads", resp)
      .await?
      .json()
      .await
      .context("deserialising created lead")
  }

  /// `PATCH /api/leads/:id`
  pub async fn update(&self, id: &str, patch: &LeadPatch) -> Result<Lead> {
    let resp = self
      .client
      .patch(self.url(&format!("/leads/{id}")))
      .json(patch)
      .send()
      .await
      .context("PATCH /leads/:id failed")?;
    Self::check("PATCH /leads/:id", resp)
      .await?
      .json()
      .await
      .context("deserialising updated lead")
  }

  /// `DELETE /api/leads/:id`, returning the removed lead.
  pub async fn delete(&self, id: &str) -> Result<Lead> {
    let resp = self
      .client
      .delete(self.url(&format!("/leads/{id}")))
      .send()
      .await
      .context("DELETE /leads/:id failed")?;
    let body: DeleteBody = Self::check("DELETE /leads/:id", resp)
      .await?
      .json()
      .await
      .context("deserialising delete response")?;
    Ok(body.deleted)
  }
}
