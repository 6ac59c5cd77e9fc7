//! Subcommand implementations.
//!
//! Each command writes results to `out` and per-item failures to `err`, and
//! returns the number of failed items so `main` can pick the exit code.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chile_core::{RutGenerator, compute_check_digit};
use chile_hooks::{Document, HookRegistry, Outcome};
use rand_core::RngCore;
use serde::Serialize;
use serde_json::json;

use crate::config::{GenerateConfig, OutputFormat};

/// JSON line for one `normalize` input.
#[derive(Serialize)]
struct NormalizeResult<'a> {
  input: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  rut:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

// ─── normalize ───────────────────────────────────────────────────────────────

pub fn normalize(
  inputs: &[String],
  format: OutputFormat,
  out: &mut dyn Write,
  err: &mut dyn Write,
) -> Result<usize> {
  let mut failures = 0;
  let mut results = Vec::with_capacity(inputs.len());

  for input in inputs {
    match chile_core::normalize(input) {
      Ok(rut) => match format {
        OutputFormat::Text => writeln!(out, "{rut}")?,
        OutputFormat::Json => results.push(NormalizeResult {
          input,
          rut: Some(rut),
          error: None,
        }),
      },
      Err(e) => {
        failures += 1;
        tracing::debug!(input = %input, error = %e, "normalize failed");
        match format {
          OutputFormat::Text => writeln!(err, "{input}: {e}")?,
          OutputFormat::Json => results.push(NormalizeResult {
            input,
            rut: None,
            error: Some(e.to_string()),
          }),
        }
      }
    }
  }

  if format == OutputFormat::Json {
    serde_json::to_writer_pretty(&mut *out, &results)?;
    writeln!(out)?;
  }
  Ok(failures)
}

// ─── check-digit ─────────────────────────────────────────────────────────────

pub fn check_digit(
  body: &str,
  format: OutputFormat,
  out: &mut dyn Write,
) -> Result<()> {
  let body = body.trim().replace('.', "");
  let dv = compute_check_digit(&body)?;
  match format {
    OutputFormat::Text => writeln!(out, "{dv}")?,
    OutputFormat::Json => {
      let value = json!({
        "body":        body,
        "check_digit": dv.to_string(),
        "rut":         format!("{body}-{dv}"),
      });
      writeln!(out, "{value}")?;
    }
  }
  Ok(())
}

// ─── generate ────────────────────────────────────────────────────────────────

pub fn generate<R: RngCore>(
  rng: R,
  cfg: &GenerateConfig,
  format: OutputFormat,
  out: &mut dyn Write,
) -> Result<()> {
  let range = cfg.body_range()?;
  tracing::debug!(?range, count = cfg.count, "generating RUTs");

  let ruts = RutGenerator::new(rng, range)?.generate(cfg.count)?;
  match format {
    OutputFormat::Text => {
      for rut in &ruts {
        writeln!(out, "{rut}")?;
      }
    }
    OutputFormat::Json => {
      serde_json::to_writer_pretty(&mut *out, &ruts)?;
      writeln!(out)?;
    }
  }
  Ok(())
}

// ─── validate ────────────────────────────────────────────────────────────────

/// Run the default save hooks over a JSON array of documents.
///
/// Writes the (possibly rewritten) documents to `out`. Rejected documents
/// are written unchanged and reported on `err`.
pub fn validate(
  input: &mut dyn Read,
  format: OutputFormat,
  out: &mut dyn Write,
  err: &mut dyn Write,
) -> Result<usize> {
  let mut raw = String::new();
  input.read_to_string(&mut raw).context("failed to read documents")?;
  let mut docs: Vec<Document> =
    serde_json::from_str(&raw).context("expected a JSON array of documents")?;

  let results = HookRegistry::default().run_all(&mut docs);

  let mut failures = 0;
  for (index, result) in results.iter().enumerate() {
    match result {
      Ok(outcomes) => {
        let changed = outcomes
          .iter()
          .filter(|o| matches!(o.outcome, Outcome::Normalized { .. }))
          .count();
        tracing::info!(index, changed, "document accepted");
      }
      Err(e) => {
        failures += 1;
        let label = e.name.as_deref().unwrap_or("<unnamed>");
        writeln!(err, "{} {label} [{index}] {}: {e}", e.doctype, e.field)?;
      }
    }
  }

  match format {
    OutputFormat::Text => {
      for doc in &docs {
        writeln!(out, "{}", serde_json::to_string(doc)?)?;
      }
    }
    OutputFormat::Json => {
      serde_json::to_writer_pretty(&mut *out, &docs)?;
      writeln!(out)?;
    }
  }
  Ok(failures)
}

#[cfg(test)]
mod tests {
  use rand_core::OsRng;
  use serde_json::Value;

  use super::*;

  fn run_normalize(
    inputs: &[&str],
    format: OutputFormat,
  ) -> (String, String, usize) {
    let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let failures = normalize(&inputs, format, &mut out, &mut err).unwrap();
    (
      String::from_utf8(out).unwrap(),
      String::from_utf8(err).unwrap(),
      failures,
    )
  }

  #[test]
  fn normalize_text_prints_canonical_forms() {
    let (out, err, failures) =
      run_normalize(&["12.345.678-5", "9876543-3"], OutputFormat::Text);
    assert_eq!(out, "12345678-5\n9876543-3\n");
    assert!(err.is_empty());
    assert_eq!(failures, 0);
  }

  #[test]
  fn normalize_text_reports_failures() {
    let (out, err, failures) =
      run_normalize(&["76543210-0", "6-k"], OutputFormat::Text);
    assert_eq!(out, "6-K\n");
    assert!(err.starts_with("76543210-0: "));
    assert_eq!(failures, 1);
  }

  #[test]
  fn normalize_json_includes_errors() {
    let (out, _, failures) =
      run_normalize(&["123456785", "12A45678-5"], OutputFormat::Json);
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["rut"], "12345678-5");
    assert!(value[1]["error"].is_string());
    assert!(value[1].get("rut").is_none());
    assert_eq!(failures, 1);
  }

  #[test]
  fn check_digit_accepts_dotted_bodies() {
    let mut out = Vec::new();
    check_digit("77.321.890", OutputFormat::Text, &mut out).unwrap();
    assert_eq!(out, b"0\n");
  }

  #[test]
  fn check_digit_rejects_letters() {
    let mut out = Vec::new();
    assert!(check_digit("12A", OutputFormat::Text, &mut out).is_err());
  }

  #[test]
  fn generate_writes_requested_count() {
    let cfg = GenerateConfig {
      count: 5,
      ..GenerateConfig::default()
    };
    let mut out = Vec::new();
    generate(OsRng, &cfg, OutputFormat::Text, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| chile_core::is_valid(l)));
  }

  #[test]
  fn validate_rewrites_and_reports() {
    let input = r#"[
      {"doctype": "Customer", "name": "CUST-1", "tax_id": "12.345.678-5"},
      {"doctype": "Employee", "name": "EMP-1", "rut": "12.345.678-4"},
      {"doctype": "Address", "address_line1": "Av. Providencia 1234"}
    ]"#;
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let failures =
      validate(&mut input.as_bytes(), OutputFormat::Json, &mut out, &mut err)
        .unwrap();

    assert_eq!(failures, 1);
    let docs: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(docs[0]["tax_id"], "12345678-5");
    assert_eq!(docs[1]["rut"], "12.345.678-4");
    assert_eq!(docs[2]["address_line1"], "Av. Providencia 1234");

    let err = String::from_utf8(err).unwrap();
    assert!(err.starts_with("Employee EMP-1 [1] rut: "));
  }

  #[test]
  fn validate_counts_numeric_ruts() {
    let input = r#"[
      {"doctype": "Employee", "name": "EMP-2", "rut": 123456789},
      {"doctype": "Supplier", "name": "SUP-2", "tax_id": 98765433}
    ]"#;
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let failures =
      validate(&mut input.as_bytes(), OutputFormat::Json, &mut out, &mut err)
        .unwrap();

    assert_eq!(failures, 1);
    let docs: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(docs[0]["rut"], 123456789);
    assert_eq!(docs[1]["tax_id"], "9876543-3");
    let err = String::from_utf8(err).unwrap();
    assert!(err.starts_with("Employee EMP-2 [0] rut: "));
  }

  #[test]
  fn validate_rejects_non_array_input() {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let result = validate(
      &mut "{}".as_bytes(),
      OutputFormat::Text,
      &mut out,
      &mut err,
    );
    assert!(result.is_err());
  }
}
