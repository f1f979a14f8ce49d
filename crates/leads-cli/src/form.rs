//! Create and edit forms shown as a popup over the lead table.

use leads_core::lead::{Lead, LeadPatch, LeadStatus};

use crate::client::CreateRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
  Create,
  Edit { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  /// Cycled with ←/→ instead of typed.
  Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
  pub label: &'static str,
  pub value: String,
  pub kind:  FieldKind,
}

impl Field {
  fn text(label: &'static str, value: impl Into<String>) -> Self {
    Self { label, value: value.into(), kind: FieldKind::Text }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
  pub kind:   FormKind,
  pub fields: Vec<Field>,
  /// Index of the focused field.
  pub focus:  usize,
}

impl Form {
  /// Blank form for `POST /leads`.
  pub fn create() -> Self {
    Self {
      kind:   FormKind::Create,
      fields: vec![
        Field::text("Name", ""),
        Field::text("Email", ""),
        Field::text("Company", ""),
        Field::text("Source", ""),
        Field::text("Notes", ""),
      ],
      focus:  0,
    }
  }

  /// Form over the mutable fields of `lead`, pre-filled.
  pub fn edit(lead: &Lead) -> Self {
    Self {
      kind:   FormKind::Edit { id: lead.id.clone() },
      fields: vec![
        Field::text("Company", lead.company.as_str()),
        Field {
          label: "Status",
          value: lead.status.to_string(),
          kind:  FieldKind::Status,
        },
        Field::text("Notes", lead.notes.as_str()),
      ],
      focus:  0,
    }
  }

  pub fn title(&self) -> &'static str {
    match self.kind {
      FormKind::Create => " New lead ",
      FormKind::Edit { .. } => " Edit lead ",
    }
  }

  pub fn next(&mut self) { self.focus = (self.focus + 1) % self.fields.len(); }

  pub fn prev(&mut self) {
    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
  }

  pub fn input(&mut self, c: char) {
    let field = &mut self.fields[self.focus];
    if field.kind == FieldKind::Text {
      field.value.push(c);
    }
  }

  pub fn backspace(&mut self) {
    let field = &mut self.fields[self.focus];
    if field.kind == FieldKind::Text {
      field.value.pop();
    }
  }

  /// Move the focused status field to the next (or previous) status.
  pub fn cycle_status(&mut self, forward: bool) {
    let field = &mut self.fields[self.focus];
    if field.kind != FieldKind::Status {
      return;
    }
    let all = LeadStatus::ALL;
    let current = field
      .value
      .parse::<LeadStatus>()
      .ok()
      .and_then(|s| all.iter().position(|x| *x == s))
      .unwrap_or(0);
    let next = if forward {
      (current + 1) % all.len()
    } else {
      (current + all.len() - 1) % all.len()
    };
    field.value = all[next].to_string();
  }

  fn value(&self, label: &str) -> &str {
    self
      .fields
      .iter()
      .find(|f| f.label == label)
      .map(|f| f.value.as_str())
      .unwrap_or_default()
  }

  pub fn create_request(&self) -> CreateRequest {
    CreateRequest {
      name:    self.value("Name").to_owned(),
      email:   self.value("Email").to_owned(),
      company: self.value("Company").to_owned(),
      source:  self.value("Source").to_owned(),
      notes:   self.value("Notes").to_owned(),
    }
  }

  /// Every editable field is sent, changed or not.
  pub fn patch(&self) -> LeadPatch {
    LeadPatch {
      status:  self.value("Status").parse().ok(),
      notes:   Some(self.value("Notes").to_owned()),
      company: Some(self.value("Company").to_owned()),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use leads_core::lead::NewLead;

  use super::*;

  fn lead() -> Lead {
    let mut input = NewLead::new("Ada", "ada@x.com");
    input.company = Some("Acme".into());
    Lead::from_new(input, "42".into(), Utc::now())
  }

  #[test]
  fn typing_fills_focused_field() {
    let mut form = Form::create();
    for c in "Ada".chars() {
      form.input(c);
    }
    form.next();
    for c in "ada@x.co".chars() {
      form.input(c);
    }
    form.input('m');
    form.backspace();
    form.input('m');

    let req = form.create_request();
    assert_eq!(req.name, "Ada");
    assert_eq!(req.email, "ada@x.com");
    assert_eq!(req.company, "");
  }

  #[test]
  fn focus_wraps() {
    let mut form = Form::create();
    form.prev();
    assert_eq!(form.focus, 4);
    form.next();
    assert_eq!(form.focus, 0);
  }

  #[test]
  fn edit_prefills_and_patches_mutable_fields() {
    let mut form = Form::edit(&lead());
    assert_eq!(form.kind, FormKind::Edit { id: "42".into() });
    assert_eq!(form.fields[0].value, "Acme");

    form.next();
    form.input('x');
    assert_eq!(form.fields[1].value, "New");
    form.cycle_status(true);
    form.cycle_status(true);
    assert_eq!(form.fields[1].value, "Qualified");
    form.cycle_status(false);
    assert_eq!(form.fields[1].value, "Contacted");

    form.next();
    for c in "call".chars() {
      form.input(c);
    }

    assert_eq!(form.patch(), LeadPatch {
      status:  Some(LeadStatus::Contacted),
      notes:   Some("call".into()),
      company: Some("Acme".into()),
    });
  }

  #[test]
  fn status_cycles_backwards_from_first() {
    let mut form = Form::edit(&lead());
    form.focus = 1;
    form.cycle_status(false);
    assert_eq!(form.fields[1].value, "Lost");
  }
}
