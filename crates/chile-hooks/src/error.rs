//! Error type surfaced to the user when a save is rejected.

use thiserror::Error;

use crate::doctype::DocType;

/// A RUT field failed validation; the record must not be saved.
///
/// `Display` is the underlying RUT error message, unchanged.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ValidationError {
  pub doctype: DocType,
  /// Record name, when the record has one.
  pub name:    Option<String>,
  pub field:   String,
  pub source:  chile_core::Error,
}
