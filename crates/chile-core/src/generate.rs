//! Random, unique RUTs for demo and seed data.
//!
//! Bodies are drawn from a high numeric range so that generated identifiers
//! are unlikely to belong to real people or companies.

use std::{collections::HashSet, ops::RangeInclusive};

use rand_core::RngCore;

use crate::{
  error::{Error, Result},
  rut::Rut,
};

/// Body range used for demo employees.
pub const EMPLOYEE_RANGE: RangeInclusive<u64> = 60_000_000..=99_999_999;

/// Body range used for demo customers and suppliers.
pub const CUSTOMER_RANGE: RangeInclusive<u64> = 90_000_000..=99_999_999;

/// Draws RUTs uniformly from a body range without repeating any.
pub struct RutGenerator<R> {
  rng:  R,
  min:  u64,
  max:  u64,
  /// Bodies already handed out or reserved by the caller.
  used: HashSet<u64>,
}

impl<R: RngCore> RutGenerator<R> {
  pub fn new(rng: R, range: RangeInclusive<u64>) -> Result<Self> {
    let (min, max) = range.into_inner();
    if min > max {
      return Err(Error::InvalidRange { min, max });
    }
    Ok(Self {
      rng,
      min,
      max,
      used: HashSet::new(),
    })
  }

  /// Reserve RUTs that already exist so they are never generated.
  ///
  /// RUTs outside the range are ignored.
  pub fn with_existing<'a>(
    mut self,
    existing: impl IntoIterator<Item = &'a Rut>,
  ) -> Self {
    let (min, max) = (self.min, self.max);
    self.used.extend(
      existing
        .into_iter()
        .filter_map(Rut::number)
        .filter(|n| (min..=max).contains(n)),
    );
    self
  }

  /// Number of bodies in the range not yet used.
  pub fn remaining(&self) -> u64 {
    (self.max - self.min).saturating_add(1) - self.used.len() as u64
  }

  /// Generate the next unused RUT.
  pub fn next_rut(&mut self) -> Result<Rut> {
    if self.remaining() == 0 {
      return Err(Error::RangeExhausted {
        min: self.min,
        max: self.max,
      });
    }
    loop {
      let body = self.draw();
      if self.used.insert(body) {
        return Ok(Rut::from_number(body));
      }
    }
  }

  /// Generate `count` unused RUTs.
  pub fn generate(&mut self, count: usize) -> Result<Vec<Rut>> {
    (0..count).map(|_| self.next_rut()).collect()
  }

  fn draw(&mut self) -> u64 {
    match (self.max - self.min).checked_add(1) {
      Some(span) => self.min + self.rng.next_u64() % span,
      // The range covers every u64.
      None => self.rng.next_u64(),
    }
  }
}

#[cfg(test)]
mod tests {
  use rand_core::{Error as RngError, impls};

  use super::*;
  use crate::rut::is_valid;

  /// Deterministic RNG: a 64-bit LCG.
  struct Lcg(u64);

  impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 { self.next_u64() as u32 }

    fn next_u64(&mut self) -> u64 {
      self.0 = self
        .0
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
      self.0 >> 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
      impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  #[test]
  fn generated_ruts_are_valid_and_in_range() {
    let mut generator = RutGenerator::new(Lcg(7), EMPLOYEE_RANGE).unwrap();
    for rut in generator.generate(200).unwrap() {
      assert!(is_valid(&rut.to_string()), "{rut} should be valid");
      assert!(EMPLOYEE_RANGE.contains(&rut.number().unwrap()));
    }
  }

  #[test]
  fn generated_ruts_are_unique() {
    let mut generator = RutGenerator::new(Lcg(1), 1..=50).unwrap();
    let ruts = generator.generate(50).unwrap();
    let distinct: HashSet<_> = ruts.iter().collect();
    assert_eq!(distinct.len(), 50);
  }

  #[test]
  fn exhausted_range_is_an_error() {
    let mut generator = RutGenerator::new(Lcg(3), 10..=12).unwrap();
    generator.generate(3).unwrap();
    assert_eq!(
      generator.next_rut(),
      Err(Error::RangeExhausted { min: 10, max: 12 })
    );
  }

  #[test]
  fn existing_ruts_are_skipped() {
    let existing = [Rut::from_number(5), Rut::from_number(6)];
    let mut generator = RutGenerator::new(Lcg(9), 5..=7)
      .unwrap()
      .with_existing(&existing);
    assert_eq!(generator.remaining(), 1);
    assert_eq!(generator.next_rut().unwrap().to_string(), "7-8");
  }

  #[test]
  fn existing_ruts_outside_range_are_ignored() {
    let existing = [Rut::from_number(1)];
    let generator = RutGenerator::new(Lcg(9), 5..=7)
      .unwrap()
      .with_existing(&existing);
    assert_eq!(generator.remaining(), 3);
  }

  #[test]
  fn inverted_range_is_rejected() {
    #[allow(clippy::reversed_empty_ranges)]
    let result = RutGenerator::new(Lcg(0), 10..=5);
    assert!(matches!(
      result,
      Err(Error::InvalidRange { min: 10, max: 5 })
    ));
  }
}
