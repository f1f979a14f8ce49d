//! HTTP server assembly for the leads store.
//!
//! Mounts [`leads_api::api_router`] under `/api`, optionally serves a static
//! asset directory at `/`, and wraps everything in a request trace layer.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use leads_core::store::LeadStore;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORE_PATH: &str = "leads.json";

/// Runtime server configuration, deserialised from `config.toml` and
/// `LEADS_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// JSON document holding the leads; created on first write.
  pub store_path: PathBuf,
  /// Directory served at `/` (e.g. the browser client). API only if unset.
  #[serde(default)]
  pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
  /// Layer, lowest priority first: built-in defaults, the conventional `PORT`
  /// variable (`port_env`), the optional file at `path`, then `LEADS_*`
  /// environment variables.
  pub fn load(path: &Path, port_env: Option<&str>) -> Result<Self, config::ConfigError> {
    let port = match port_env {
      Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
        config::ConfigError::Message(format!("invalid PORT {raw:?}: {e}"))
      })?,
      None => DEFAULT_PORT,
    };

    let cfg: Self = config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(port))?
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LEADS"))
      .build()?
      .try_deserialize()?;

    Ok(Self {
      store_path: expand_tilde(&cfg.store_path),
      static_dir: cfg.static_dir.as_deref().map(expand_tilde),
      ..cfg
    })
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, static_dir: Option<&Path>) -> Router
where
  S: LeadStore + 'static,
{
  let mut app = Router::new().nest("/api", leads_api::api_router(store));

  if let Some(dir) = static_dir {
    // `ServeDir` answers `/` with `index.html`.
    app = app.fallback_service(ServeDir::new(dir));
  }

  app.layer(TraceLayer::new_for_http())
}
