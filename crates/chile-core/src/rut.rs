//! The RUT value type and the SII modulo-11 check digit.
//!
//! Pipeline for untrusted input:
//!   raw &str
//!     └─ trim, uppercase, drop `.`  → cleaned
//!          └─ with_separator()      → `<body>-<check>`
//!               └─ SHAPE match, numeric and check-digit validation → Rut

use std::{borrow::Cow, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weights applied to the body digits, least significant first.
const FACTORS: [u64; 6] = [2, 3, 4, 5, 6, 7];

/// One or more decimal digits (Unicode `Nd`), a hyphen, and the DV.
static SHAPE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d+)-([0-9K])$").expect("RUT shape pattern compiles")
});

// ─── Check digit ─────────────────────────────────────────────────────────────

/// The verification character (DV) of a RUT.
///
/// Holds `0`–`9` for a digit and `10` for `K`; no other value can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckDigit(u8);

impl CheckDigit {
  /// Modulo-11 result of 10.
  pub const K: CheckDigit = CheckDigit(10);

  /// The DV for a single decimal digit, or `None` above 9.
  pub fn digit(d: u8) -> Option<Self> { (d < 10).then_some(CheckDigit(d)) }

  /// Accept `0`–`9`, `k` or `K`.
  pub fn from_char(c: char) -> Option<Self> {
    match c {
      '0'..='9' => Some(CheckDigit(c as u8 - b'0')),
      'k' | 'K' => Some(CheckDigit::K),
      _ => None,
    }
  }

  pub fn as_char(self) -> char {
    match self.0 {
      10 => 'K',
      d => char::from(b'0' + d),
    }
  }

  /// Map `11 - (sum mod 11)` onto the DV alphabet: 11 → `0`, 10 → `K`.
  fn from_weighted_sum(sum: u64) -> Self {
    match 11 - sum % 11 {
      11 => CheckDigit(0),
      dv => CheckDigit(dv as u8),
    }
  }

  /// Compute the DV for `digits`, given least significant first.
  fn for_digits(digits: impl Iterator<Item = u64>) -> Self {
    let sum = digits
      .zip(FACTORS.iter().cycle())
      .fold(0, |acc, (d, f)| (acc + d * f) % 11);
    Self::from_weighted_sum(sum)
  }

  /// Compute the DV of a numeric body.
  pub fn for_number(n: u64) -> Self {
    let digits =
      std::iter::successors(Some(n), |&rest| (rest >= 10).then(|| rest / 10))
        .map(|rest| rest % 10);
    Self::for_digits(digits)
  }
}

impl fmt::Display for CheckDigit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_char())
  }
}

/// Compute the SII check digit of `body`.
///
/// Fails with [`Error::BodyNotNumeric`] if `body` is empty or contains
/// anything other than ASCII digits.
pub fn compute_check_digit(body: &str) -> Result<CheckDigit> {
  if !is_ascii_numeric(body) {
    return Err(Error::BodyNotNumeric(body.to_string()));
  }
  Ok(CheckDigit::for_digits(
    body.bytes().rev().map(|b| u64::from(b - b'0')),
  ))
}

// ─── Rut ─────────────────────────────────────────────────────────────────────

/// A validated RUT.
///
/// The body is kept exactly as entered (minus thousands separators) so that
/// the canonical form round-trips what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut {
  body:  String,
  check: CheckDigit,
}

impl Rut {
  /// Parse, clean and verify a user-entered RUT.
  ///
  /// Accepts `12.345.678-5`, `12345678-5`, `123456785`, surrounding
  /// whitespace and a lower-case `k`. When no `-` is present the last
  /// character is taken as the check digit.
  ///
  /// Callers are expected to skip empty fields rather than call this; an
  /// empty or blank string fails with [`Error::Format`].
  pub fn parse(raw: &str) -> Result<Self> {
    let cleaned = raw.trim().to_uppercase().replace('.', "");
    let candidate = with_separator(&cleaned);

    let Some(caps) = SHAPE.captures(&candidate) else {
      return Err(Error::Format(raw.to_string()));
    };
    let (_, [body, check]) = caps.extract();
    let Some(check) = check.chars().next().and_then(CheckDigit::from_char)
    else {
      return Err(Error::Format(raw.to_string()));
    };

    // `\d` admits any Unicode decimal digit; only ASCII is computable.
    if !is_ascii_numeric(body) {
      return Err(Error::BodyNotNumeric(body.to_string()));
    }

    let expected = compute_check_digit(body)?;
    if expected != check {
      return Err(Error::CheckDigitMismatch {
        input: format!("{body}-{check}"),
        expected,
        found: check,
      });
    }

    Ok(Self {
      body: body.to_string(),
      check,
    })
  }

  /// Build the valid RUT whose body is `number`.
  pub fn from_number(number: u64) -> Self {
    Self {
      body:  number.to_string(),
      check: CheckDigit::for_number(number),
    }
  }

  pub fn body(&self) -> &str { &self.body }

  pub fn check(&self) -> CheckDigit { self.check }

  /// The body as an integer, or `None` if it does not fit in a `u64`.
  pub fn number(&self) -> Option<u64> { self.body.parse().ok() }
}

impl fmt::Display for Rut {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.body, self.check)
  }
}

impl FromStr for Rut {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for Rut {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<Rut> for String {
  fn from(rut: Rut) -> Self { rut.to_string() }
}

/// Clean, verify and return the canonical `<body>-<check>` form of `raw`.
pub fn normalize(raw: &str) -> Result<String> {
  Rut::parse(raw).map(|rut| rut.to_string())
}

/// Whether `raw` parses as a valid RUT.
pub fn is_valid(raw: &str) -> bool { Rut::parse(raw).is_ok() }

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Insert the missing `-` before the final character, which is always
/// taken as the check digit. Strings that already have a `-` are kept.
fn with_separator(s: &str) -> Cow<'_, str> {
  if s.contains('-') {
    return Cow::Borrowed(s);
  }
  match s.char_indices().next_back() {
    Some((i, _)) => Cow::Owned(format!("{}-{}", &s[..i], &s[i..])),
    None => Cow::Borrowed(s),
  }
}

fn is_ascii_numeric(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
