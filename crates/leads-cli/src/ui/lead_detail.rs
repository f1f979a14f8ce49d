//! Lead detail pane (right panel).

use chrono::Local;
use leads_core::lead::Lead;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::App, ui::lead_table::status_color};

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(lead) = &app.detail else {
    draw_empty(f, area);
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", lead.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  f.render_widget(
    Paragraph::new(lines(lead)).wrap(Wrap { trim: false }),
    inner,
  );
}

fn lines(lead: &Lead) -> Vec<Line<'static>> {
  let or_dash = |s: &str| if s.is_empty() { "-".to_owned() } else { s.to_owned() };
  let notes = if lead.notes.is_empty() {
    "(none)".to_owned()
  } else {
    lead.notes.clone()
  };

  let mut lines = vec![
    field("Name", lead.name.clone()),
    field("Email", lead.email.clone()),
    field("Company", or_dash(&lead.company)),
    field("Source", or_dash(&lead.source)),
    Line::from(vec![
      label("Status"),
      Span::styled(
        lead.status.to_string(),
        Style::default()
          .fg(status_color(lead.status))
          .add_modifier(Modifier::BOLD),
      ),
    ]),
    field("Id", lead.id.clone()),
    Line::from(""),
    Line::from(label("Notes")),
  ];
  lines.extend(notes.lines().map(|l| Line::from(l.to_owned())));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!(
      "Created at: {}",
      lead.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    ),
    Style::default()
      .fg(Color::DarkGray)
      .add_modifier(Modifier::ITALIC),
  )));
  lines
}

fn label(name: &'static str) -> Span<'static> {
  Span::styled(
    format!("{name:<10}"),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )
}

fn field(name: &'static str, value: String) -> Line<'static> {
  Line::from(vec![label(name), Span::raw(value)])
}

fn draw_empty(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Select a lead and press Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}
