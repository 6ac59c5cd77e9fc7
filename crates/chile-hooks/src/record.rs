//! The record interface the hooks operate on.
//!
//! The host framework owns the real document type; it only has to expose
//! its kind and field values, rendered as text, through [`Record`].
//! [`Document`] is a self-contained implementation used by the CLI and tests.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doctype::DocType;

/// A record about to be persisted.
pub trait Record {
  fn doctype(&self) -> DocType;

  /// Record name, for diagnostics.
  fn name(&self) -> Option<&str> { None }

  /// The value of `field` as text, or `None` if absent or null.
  ///
  /// Non-text values must be rendered rather than hidden, so that a number
  /// typed into a RUT field is still validated.
  fn field(&self, field: &str) -> Option<Cow<'_, str>>;

  fn set_field(&mut self, field: &str, value: String);
}

/// A generic record: a doctype plus a flat map of fields.
///
/// JSON shape: `{"doctype": "Customer", "name": "CUST-0001", "tax_id": "…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub doctype: DocType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:    Option<String>,
  #[serde(flatten)]
  pub fields:  BTreeMap<String, Value>,
}

impl Document {
  pub fn new(doctype: DocType) -> Self {
    Self {
      doctype,
      name: None,
      fields: BTreeMap::new(),
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_field(
    mut self,
    field: impl Into<String>,
    value: impl Into<Value>,
  ) -> Self {
    self.fields.insert(field.into(), value.into());
    self
  }
}

impl Record for Document {
  fn doctype(&self) -> DocType { self.doctype.clone() }

  fn name(&self) -> Option<&str> { self.name.as_deref() }

  fn field(&self, field: &str) -> Option<Cow<'_, str>> {
    match self.fields.get(field)? {
      Value::Null => None,
      Value::String(s) => Some(Cow::Borrowed(s)),
      other => Some(Cow::Owned(other.to_string())),
    }
  }

  fn set_field(&mut self, field: &str, value: String) {
    self.fields.insert(field.to_string(), Value::String(value));
  }
}
