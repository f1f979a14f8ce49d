//! TUI rendering: header, table and detail panes, status bar, popups.

pub mod form;
pub mod lead_detail;
pub mod lead_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  match &app.mode {
    Mode::Form(state) => form::draw(f, area, state),
    Mode::ConfirmDelete { name, .. } => form::draw_confirm(f, area, name),
    Mode::Normal | Mode::Search => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " leads  [a] add  [/] search  [f] filter  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  let pad = area
    .width
    .saturating_sub(left.content.len() as u16)
    .saturating_sub(right.content.len() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  lead_table::draw(f, cols[0], app);
  lead_detail::draw(f, cols[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.mode {
    Mode::Normal => (
      "NORMAL",
      "↑↓/jk move  Enter view  e edit  d delete  1-4 status  r reload",
    ),
    Mode::Search => ("SEARCH", "Type to search  Enter apply  Esc clear"),
    Mode::Form(_) => (
      "FORM",
      "Tab next field  ←→ status  Enter save  Esc cancel",
    ),
    Mode::ConfirmDelete { .. } => ("DELETE", "y confirm  any other key cancels"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(Paragraph::new(Line::from(vec![mode_span, hint_span])), area);
}

/// A rectangle of `width` × `height` centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn centered_clamps_to_area() {
    let area = Rect::new(0, 0, 20, 10);
    assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
    assert_eq!(centered(area, 50, 50), area);
  }
}
