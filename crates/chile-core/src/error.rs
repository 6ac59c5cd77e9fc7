//! Error types for `chile-core`.

use thiserror::Error;

use crate::rut::CheckDigit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The input does not reduce to `<digits>-<digit or K>` after cleanup.
  #[error("invalid RUT format, expected 12345678-K: {0:?}")]
  Format(String),

  #[error("invalid RUT: the body must be numeric: {0:?}")]
  BodyNotNumeric(String),

  #[error("invalid RUT: check digit does not match ({input})")]
  CheckDigitMismatch {
    /// The cleaned `<body>-<check>` the caller supplied.
    input:    String,
    expected: CheckDigit,
    found:    CheckDigit,
  },

  #[error("empty RUT range {min}..={max}")]
  InvalidRange { min: u64, max: u64 },

  #[error("every RUT in {min}..={max} is already in use")]
  RangeExhausted { min: u64, max: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
