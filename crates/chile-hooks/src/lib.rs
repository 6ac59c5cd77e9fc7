//! Record-save validation hooks for Chilean RUT fields.
//!
//! The host document framework hands each record to a [`HookRegistry`]
//! before persisting it. Every RUT field registered for the record's
//! [`DocType`] is normalized in place, or the save is rejected with a
//! [`ValidationError`] whose message is shown to the user verbatim.
//!
//! # Quick start
//!
//! ```
//! use chile_hooks::{DocType, Document, HookRegistry, Record};
//!
//! let mut doc =
//!   Document::new(DocType::Customer).with_field("tax_id", "12.345.678-5");
//! HookRegistry::default().run(&mut doc).unwrap();
//! assert_eq!(doc.field("tax_id").as_deref(), Some("12345678-5"));
//! ```

pub mod doctype;
pub mod error;
pub mod hooks;
pub mod record;

pub use doctype::DocType;
pub use error::ValidationError;
pub use hooks::{
  FieldOutcome, HookRegistry, Outcome, RUT_FIELD, TAX_ID_FIELD,
  validate_employee_rut, validate_rut_field, validate_shareholder_rut,
  validate_tax_id,
};
pub use record::{Document, Record};
