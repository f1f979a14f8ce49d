//! Lead table (left panel).

use leads_core::lead::LeadStatus;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use crate::app::{App, Mode};

/// Badge colour per status, the way the browser client styled them.
pub fn status_color(status: LeadStatus) -> Color {
  match status {
    LeadStatus::New => Color::Cyan,
    LeadStatus::Contacted => Color::Yellow,
    LeadStatus::Qualified => Color::Green,
    LeadStatus::Lost => Color::Red,
  }
}

/// Render the lead table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filter = app
    .status_filter
    .map(|s| format!(" [{s}]"))
    .unwrap_or_default();
  let title = format!(" Leads ({}){filter} ", app.leads.len());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar at the bottom of the panel while searching or when a search
  // is applied.
  if (app.mode == Mode::Search || !app.search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.mode == Mode::Search {
      format!("/{}_", app.search)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if app.leads.is_empty() {
    f.render_widget(
      Paragraph::new("No leads. Press a to add one.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let header = Row::new(["Name", "Email", "Company", "Status"]).style(
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let rows = app.leads.iter().map(|lead| {
    Row::new(vec![
      Line::from(lead.name.clone()),
      Line::from(lead.email.clone()),
      Line::from(lead.company.clone()),
      Line::from(Span::styled(
        lead.status.to_string(),
        Style::default().fg(status_color(lead.status)),
      )),
    ])
  });

  let table = Table::new(rows, [
    Constraint::Percentage(25),
    Constraint::Percentage(35),
    Constraint::Percentage(25),
    Constraint::Percentage(15),
  ])
  .header(header)
  .row_highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let mut state = TableState::default();
  state.select(Some(app.cursor));
  f.render_stateful_widget(table, inner_area, &mut state);
}
