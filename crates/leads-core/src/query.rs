//! Filter parameters for [`crate::store::LeadStore::list`].

use crate::lead::Lead;

/// Both filters are optional; an empty string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
  /// Case-insensitive substring matched against `name + company + id`.
  pub text:   Option<String>,
  /// Case-insensitive exact match against the status name.
  pub status: Option<String>,
}

impl LeadQuery {
  /// Build a query from raw request parameters, lower-casing them and
  /// dropping empty values.
  pub fn new(text: Option<&str>, status: Option<&str>) -> Self {
    let normalise = |s: Option<&str>| {
      s.map(str::to_lowercase).filter(|s| !s.is_empty())
    };
    Self {
      text:   normalise(text),
      status: normalise(status),
    }
  }

  pub fn is_empty(&self) -> bool { self.text.is_none() && self.status.is_none() }

  pub fn matches(&self, lead: &Lead) -> bool {
    if let Some(text) = &self.text {
      let haystack =
        format!("{}{}{}", lead.name, lead.company, lead.id).to_lowercase();
      if !haystack.contains(&text.to_lowercase()) {
        return false;
      }
    }
    if let Some(status) = &self.status
      && !lead.status.as_ref().eq_ignore_ascii_case(status)
    {
      return false;
    }
    true
  }

  /// Keep the matching leads, preserving their order.
  pub fn filter<'a>(
    &'a self,
    leads: impl IntoIterator<Item = &'a Lead> + 'a,
  ) -> impl Iterator<Item = &'a Lead> + 'a {
    leads.into_iter().filter(move |lead| self.matches(lead))
  }
}
