//! `rut` — normalize, verify and generate Chilean RUTs.
//!
//! # Usage
//!
//! ```text
//! rut normalize 12.345.678-5 9876543-3
//! rut check-digit 77.321.890
//! rut generate --count 10 --range customer
//! rut validate records.json > normalized.json
//! rut --format json normalize 123456785
//! ```

mod commands;
mod config;

use std::{
  fs::File,
  io::{self, Read},
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand_core::OsRng;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, GenerateFlags, OutputFormat};

// ─── CLI args ───────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "rut",
  version,
  about = "Chilean RUT normalization and validation"
)]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "rut.toml")]
  config: PathBuf,

  /// Output format (overrides the config file).
  #[arg(short, long, value_enum)]
  format: Option<OutputFormat>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the canonical form of each RUT.
  Normalize {
    #[arg(required = true, value_name = "RUT")]
    ruts: Vec<String>,
  },

  /// Print the check digit for a RUT body.
  CheckDigit {
    #[arg(value_name = "BODY")]
    body: String,
  },

  /// Print unique, valid RUTs for demo data.
  Generate(GenerateFlags),

  /// Run the save hooks over a JSON array of documents (`-` for stdin).
  Validate {
    #[arg(value_name = "FILE")]
    input: PathBuf,
  },
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = CliConfig::load(cli.config)?.with_format(cli.format);

  let mut stdout = io::stdout().lock();
  let mut stderr = io::stderr().lock();

  let failures = match cli.command {
    Command::Normalize { ruts } => {
      commands::normalize(&ruts, cfg.format, &mut stdout, &mut stderr)?
    }
    Command::CheckDigit { body } => {
      commands::check_digit(&body, cfg.format, &mut stdout)?;
      0
    }
    Command::Generate(flags) => {
      let generate = cfg.generate.clone().with_flags(&flags);
      commands::generate(OsRng, &generate, cfg.format, &mut stdout)?;
      0
    }
    Command::Validate { input } => {
      let mut reader = open_input(&input)?;
      let failures = commands::validate(
        &mut reader,
        cfg.format,
        &mut stdout,
        &mut stderr,
      )?;
      if failures > 0 {
        tracing::warn!(failures, "some documents were rejected");
      }
      failures
    }
  };

  Ok(if failures == 0 {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

/// Open `path` for reading, treating `-` as stdin.
fn open_input(path: &Path) -> Result<Box<dyn Read>> {
  if path.as_os_str() == "-" {
    return Ok(Box::new(io::stdin()));
  }
  let file = File::open(path)
    .with_context(|| format!("failed to open {}", path.display()))?;
  Ok(Box::new(file))
}
