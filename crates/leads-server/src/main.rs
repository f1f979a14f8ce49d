//! leads-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! JSON lead store, and serves the REST API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use leads_server::ServerConfig;
use leads_store_json::JsonFileStore;
use tokio::{net::TcpListener, signal};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Leads REST server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let port_env = std::env::var("PORT").ok();
  let server_cfg = ServerConfig::load(&cli.config, port_env.as_deref())
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store = JsonFileStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  if let Some(dir) = &server_cfg.static_dir {
    tracing::info!(dir = %dir.display(), "serving static assets");
  }

  let app = leads_server::router(Arc::new(store), server_cfg.static_dir.as_deref());
  let address = server_cfg.address();

  tracing::info!(store = %server_cfg.store_path.display(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::warn!(error = %e, "failed to listen for Ctrl+C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
