//! Per-entity RUT hooks and the doctype → hook registry.

use std::collections::HashMap;

use chile_core::normalize;
use tracing::{debug, warn};

use crate::{doctype::DocType, error::ValidationError, record::Record};

/// Field holding the RUT on suppliers and customers.
pub const TAX_ID_FIELD: &str = "tax_id";

/// Field holding the RUT on employees and shareholders.
pub const RUT_FIELD: &str = "rut";

/// What a hook did to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The field was absent, null or empty; nothing to validate.
  Skipped,
  /// The value was already canonical.
  Unchanged,
  /// The value was rewritten to its canonical form.
  Normalized { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
  pub field:   String,
  pub outcome: Outcome,
}

// ─── Single-field hooks ──────────────────────────────────────────────────────

/// Compute the canonical value of `field` without touching the record.
///
/// Returns `Ok(None)` when the field is absent, null or empty.
fn check_field<R: Record + ?Sized>(
  record: &R,
  field: &str,
) -> Result<Option<(String, String)>, ValidationError> {
  let Some(raw) = record.field(field).filter(|v| !v.is_empty()) else {
    return Ok(None);
  };
  match normalize(&raw) {
    Ok(canonical) => Ok(Some((raw.into_owned(), canonical))),
    Err(source) => {
      warn!(
        doctype = %record.doctype(),
        name = record.name(),
        field,
        %source,
        "rejected RUT"
      );
      Err(ValidationError {
        doctype: record.doctype(),
        name: record.name().map(str::to_string),
        field: field.to_string(),
        source,
      })
    }
  }
}

/// Write a checked value back and report what changed.
fn apply<R: Record + ?Sized>(
  record: &mut R,
  field: &str,
  checked: Option<(String, String)>,
) -> Outcome {
  match checked {
    None => {
      debug!(doctype = %record.doctype(), field, "RUT field empty, skipped");
      Outcome::Skipped
    }
    Some((from, to)) if from == to => Outcome::Unchanged,
    Some((from, to)) => {
      debug!(
        doctype = %record.doctype(),
        name = record.name(),
        field,
        from = %from,
        to = %to,
        "normalized RUT"
      );
      record.set_field(field, to.clone());
      Outcome::Normalized { from, to }
    }
  }
}

/// Validate and rewrite the RUT held in `field`.
///
/// An absent or empty field is skipped. On error the record is left
/// untouched.
pub fn validate_rut_field<R: Record + ?Sized>(
  record: &mut R,
  field: &str,
) -> Result<Outcome, ValidationError> {
  let checked = check_field(&*record, field)?;
  Ok(apply(record, field, checked))
}

/// Hook for suppliers, customers, and any record with a `tax_id`.
pub fn validate_tax_id<R: Record + ?Sized>(
  record: &mut R,
) -> Result<Outcome, ValidationError> {
  validate_rut_field(record, TAX_ID_FIELD)
}

pub fn validate_employee_rut<R: Record + ?Sized>(
  record: &mut R,
) -> Result<Outcome, ValidationError> {
  validate_rut_field(record, RUT_FIELD)
}

pub fn validate_shareholder_rut<R: Record + ?Sized>(
  record: &mut R,
) -> Result<Outcome, ValidationError> {
  validate_rut_field(record, RUT_FIELD)
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Which RUT fields to validate for each doctype.
#[derive(Debug, Clone)]
pub struct HookRegistry {
  fields: HashMap<DocType, Vec<String>>,
}

impl Default for HookRegistry {
  /// Suppliers and customers carry `tax_id`; employees and shareholders
  /// carry `rut`.
  fn default() -> Self {
    let mut registry = Self::empty();
    registry
      .register(DocType::Supplier, TAX_ID_FIELD)
      .register(DocType::Customer, TAX_ID_FIELD)
      .register(DocType::Employee, RUT_FIELD)
      .register(DocType::Shareholder, RUT_FIELD);
    registry
  }
}

impl HookRegistry {
  /// A registry with no hooks.
  pub fn empty() -> Self {
    Self {
      fields: HashMap::new(),
    }
  }

  /// Validate `field` whenever a record of `doctype` is saved.
  pub fn register(
    &mut self,
    doctype: DocType,
    field: impl Into<String>,
  ) -> &mut Self {
    let field = field.into();
    let fields = self.fields.entry(doctype).or_default();
    if !fields.contains(&field) {
      fields.push(field);
    }
    self
  }

  /// The RUT fields registered for `doctype`, in registration order.
  pub fn fields_for(&self, doctype: &DocType) -> &[String] {
    self.fields.get(doctype).map(Vec::as_slice).unwrap_or_default()
  }

  /// Run every hook registered for the record's doctype.
  ///
  /// All fields are checked before any is rewritten, so a rejected record
  /// is left exactly as it was entered.
  pub fn run<R: Record + ?Sized>(
    &self,
    record: &mut R,
  ) -> Result<Vec<FieldOutcome>, ValidationError> {
    let fields = self.fields_for(&record.doctype());
    let checked = fields
      .iter()
      .map(|field| check_field(&*record, field))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(
      fields
        .iter()
        .zip(checked)
        .map(|(field, checked)| FieldOutcome {
          field:   field.clone(),
          outcome: apply(record, field, checked),
        })
        .collect(),
    )
  }

  /// Run [`HookRegistry::run`] over a batch; one result per record.
  ///
  /// A rejected record does not stop the rest of the batch.
  pub fn run_all<R: Record>(
    &self,
    records: &mut [R],
  ) -> Vec<Result<Vec<FieldOutcome>, ValidationError>> {
    records.iter_mut().map(|record| self.run(record)).collect()
  }
}
