//! Document kinds known to the validation hooks.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// The kind of record being saved.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum DocType {
  Supplier,
  Customer,
  Employee,
  Shareholder,
  /// Any other document kind, by name.
  #[strum(default)]
  Other(String),
}

impl DocType {
  pub fn as_str(&self) -> &str {
    match self {
      DocType::Supplier => "Supplier",
      DocType::Customer => "Customer",
      DocType::Employee => "Employee",
      DocType::Shareholder => "Shareholder",
      DocType::Other(name) => name,
    }
  }
}

impl fmt::Display for DocType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<String> for DocType {
  fn from(s: String) -> Self { s.parse().unwrap_or(DocType::Other(s)) }
}

impl From<DocType> for String {
  fn from(doctype: DocType) -> Self { doctype.as_str().to_string() }
}
