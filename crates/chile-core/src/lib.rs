//! Chilean RUT (Rol Único Tributario) handling for the chile-custom add-on.
//!
//! Parses loosely formatted RUT strings, computes the SII modulo-11 check
//! digit, and produces the canonical `<body>-<check>` form. Pure and
//! synchronous; no I/O, no logging, no shared state.
//!
//! # Quick start
//!
//! ```
//! use chile_core::{Rut, normalize};
//!
//! assert_eq!(normalize("12.345.678-5").unwrap(), "12345678-5");
//!
//! let rut: Rut = "9876543-3".parse().unwrap();
//! assert_eq!(rut.body(), "9876543");
//! ```

pub mod error;
pub mod generate;
pub mod rut;

pub use error::{Error, Result};
pub use generate::{CUSTOMER_RANGE, EMPLOYEE_RANGE, RutGenerator};
pub use rut::{CheckDigit, Rut, compute_check_digit, is_valid, normalize};
