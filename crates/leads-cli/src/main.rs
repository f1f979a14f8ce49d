//! `leads`: terminal client for the leads server.
//!
//! # Usage
//!
//! ```
//! leads --url http://localhost:3000
//! leads --config ~/.config/leads/config.toml
//! ```

mod app;
mod client;
mod form;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:3000";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "leads", about = "Terminal client for the leads server")]
struct Args {
  /// TOML file with a `url` key.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Server base URL, e.g. http://localhost:3000.
  #[arg(long, env = "LEADS_URL")]
  url: Option<String>,
}

#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

impl ConfigFile {
  fn read(path: Option<&PathBuf>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// `--url`/`LEADS_URL` first, then the file's `url`, then [`DEFAULT_URL`].
fn base_url(flag: Option<String>, file: ConfigFile) -> String {
  flag
    .or((!file.url.is_empty()).then_some(file.url))
    .unwrap_or_else(|| DEFAULT_URL.to_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let file = ConfigFile::read(args.config.as_ref())?;

  let client = ApiClient::new(ApiConfig {
    base_url: base_url(args.url, file),
  })?;
  let mut app = App::new(client);

  // Startup still proceeds when the server is down; `r` reloads.
  if let Err(e) = app.load().await {
    app.status_msg = format!("Error: {e}");
  }

  let mut terminal = enter_terminal()?;
  let outcome = run(&mut terminal, &mut app).await;
  leave_terminal(&mut terminal);
  outcome
}

fn enter_terminal() -> Result<Term> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  Terminal::new(CrosstermBackend::new(stdout)).context("creating terminal")
}

/// Best effort: nothing useful can be done if the terminal refuses.
fn leave_terminal(terminal: &mut Term) {
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();
}

async fn run(terminal: &mut Term, app: &mut App) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // crossterm blocks; keep the runtime's other workers free meanwhile.
    let next = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
      if event::poll(POLL_INTERVAL)? {
        event::read().map(Some)
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = next
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await
    {
      return Ok(());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flag_beats_file_beats_default() {
    let file = || ConfigFile { url: "http://file:1".into() };
    assert_eq!(base_url(Some("http://flag:2".into()), file()), "http://flag:2");
    assert_eq!(base_url(None, file()), "http://file:1");
    assert_eq!(base_url(None, ConfigFile::default()), DEFAULT_URL);
  }

  #[test]
  fn config_file_reads_url() {
    let file: ConfigFile = toml::from_str("url = \"http://10.0.0.5:3000\"\n").unwrap();
    assert_eq!(file.url, "http://10.0.0.5:3000");
    assert!(ConfigFile::read(None).unwrap().url.is_empty());
  }
}
