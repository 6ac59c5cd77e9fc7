//! CLI configuration: optional TOML file, then `RUT_*` environment
//! variables, then command-line flags.

use std::{ops::RangeInclusive, path::PathBuf};

use anyhow::{Context, Result, bail};
use chile_core::{CUSTOMER_RANGE, EMPLOYEE_RANGE};
use clap::{Args, ValueEnum};
use serde::Deserialize;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

/// Named body ranges for generated RUTs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
  #[default]
  Employee,
  Customer,
}

impl RangePreset {
  pub fn range(self) -> RangeInclusive<u64> {
    match self {
      RangePreset::Employee => EMPLOYEE_RANGE,
      RangePreset::Customer => CUSTOMER_RANGE,
    }
  }
}

/// Defaults for `rut generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
  pub range: RangePreset,
  /// Overrides the preset's lower bound.
  pub min:   Option<u64>,
  /// Overrides the preset's upper bound.
  pub max:   Option<u64>,
  pub count: usize,
}

impl Default for GenerateConfig {
  fn default() -> Self {
    Self {
      range: RangePreset::default(),
      min:   None,
      max:   None,
      count: 1,
    }
  }
}

/// `rut generate` flags. Each one that is set overrides the config.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateFlags {
  #[arg(short = 'n', long)]
  pub count: Option<usize>,

  #[arg(short, long, value_enum)]
  pub range: Option<RangePreset>,

  /// Lowest body to draw (overrides the range preset).
  #[arg(long)]
  pub min: Option<u64>,

  /// Highest body to draw (overrides the range preset).
  #[arg(long)]
  pub max: Option<u64>,
}

impl GenerateConfig {
  pub fn with_flags(self, flags: &GenerateFlags) -> Self {
    Self {
      range: flags.range.unwrap_or(self.range),
      min:   flags.min.or(self.min),
      max:   flags.max.or(self.max),
      count: flags.count.unwrap_or(self.count),
    }
  }

  /// The effective body range: the preset, narrowed by `min`/`max`.
  pub fn body_range(&self) -> Result<RangeInclusive<u64>> {
    let preset = self.range.range();
    let min = self.min.unwrap_or(*preset.start());
    let max = self.max.unwrap_or(*preset.end());
    if min > max {
      bail!("generate range is empty: min {min} > max {max}");
    }
    Ok(min..=max)
  }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
  pub format:   OutputFormat,
  pub generate: GenerateConfig,
}

impl CliConfig {
  /// Load from `path` (if it exists) and the `RUT_` environment.
  ///
  /// Nested keys use a double underscore: `RUT_GENERATE__COUNT=10`.
  pub fn load(path: PathBuf) -> Result<Self> { Self::load_from(path, None) }

  /// As [`CliConfig::load`], reading variables from `env` instead of the
  /// process environment when it is given.
  pub fn load_from(
    path: PathBuf,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RUT")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .source(env),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }

  /// Apply the global `--format` flag, if given.
  pub fn with_format(self, format: Option<OutputFormat>) -> Self {
    Self {
      format: format.unwrap_or(self.format),
      ..self
    }
  }
}
