//! Popups drawn over the body: the create/edit form and delete confirmation.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
  form::{FieldKind, Form},
  ui::centered,
};

/// Render `form` as a centred popup.
pub fn draw(f: &mut Frame, area: Rect, form: &Form) {
  let height = form.fields.len() as u16 + 2;
  let popup = centered(area, 60, height);

  let block = Block::default()
    .title(form.title())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(Clear, popup);
  f.render_widget(block, popup);

  let lines: Vec<Line> = form
    .fields
    .iter()
    .enumerate()
    .map(|(i, field)| {
      let focused = i == form.focus;
      let label_style = if focused {
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Cyan)
      };
      let value = match (field.kind, focused) {
        (FieldKind::Status, true) => format!("< {} >", field.value),
        (FieldKind::Text, true) => format!("{}_", field.value),
        _ => field.value.clone(),
      };
      Line::from(vec![
        Span::styled(format!("{:<10}", field.label), label_style),
        Span::raw(value),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines), inner);
}

/// Render the "delete this lead?" prompt.
pub fn draw_confirm(f: &mut Frame, area: Rect, name: &str) {
  let popup = centered(area, 50, 3);

  let block = Block::default()
    .title(" Delete lead ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(popup);
  f.render_widget(Clear, popup);
  f.render_widget(block, popup);

  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::raw("Delete "),
      Span::styled(name.to_owned(), Style::default().add_modifier(Modifier::BOLD)),
      Span::raw("? [y/N]"),
    ])),
    inner,
  );
}
