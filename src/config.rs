//! Run configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Stock defaults ([`CropConfig::default`])
//! 2. `papercrop.toml` in the working directory, or the file given with
//!    `--config`
//! 3. Command-line flags ([`Overrides`])
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! format = "a4"                 # a4, a4-landscape, a3, ..., square, custom
//! custom_ratio = [1, 1]         # width:height, used when format = "custom"
//! quality = 90                  # JPEG quality (1-100)
//! output_dir = "."              # Where the zip archive is written
//! archive_prefix = "PaperCrop"  # Archive is <prefix>_<timestamp>.zip
//! recursive = false             # Descend into subdirectories of inputs
//! allow_unknown_format = false  # Crop unknown format ids square instead of failing
//! ```
//!
//! Config files are sparse and unknown keys are rejected to catch typos early.

use crate::format::{self, FormatSelector};
use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "papercrop.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one cropping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Format identifier (see [`format`](crate::format)).
    pub format: String,
    /// Width and height used when `format = "custom"`.
    pub custom_ratio: [f64; 2],
    /// JPEG quality, 1-100.
    pub quality: u32,
    /// Directory the archive is written to.
    pub output_dir: String,
    pub archive_prefix: String,
    pub recursive: bool,
    /// Accept identifiers missing from the format table and crop them square.
    pub allow_unknown_format: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            format: "a4".to_string(),
            custom_ratio: [1.0, 1.0],
            quality: Quality::default().value(),
            output_dir: ".".to_string(),
            archive_prefix: "PaperCrop".to_string(),
            recursive: false,
            allow_unknown_format: false,
        }
    }
}

impl CropConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        let [w, h] = self.custom_ratio;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(ConfigError::Validation(
                "custom_ratio values must be positive".into(),
            ));
        }
        if self.archive_prefix.is_empty() || self.archive_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "archive_prefix must be a non-empty file name".into(),
            ));
        }
        if !self.allow_unknown_format && self.selector().is_unknown() {
            let known: Vec<&str> = format::named_formats()
                .iter()
                .map(|f| f.id)
                .chain([format::CUSTOM_ID])
                .collect();
            return Err(ConfigError::Validation(format!(
                "unknown format '{}' (expected one of: {})",
                self.format,
                known.join(", ")
            )));
        }
        Ok(())
    }

    /// The format selector this config describes.
    pub fn selector(&self) -> FormatSelector {
        let [w, h] = self.custom_ratio;
        FormatSelector::parse(&self.format, (w, h))
    }

    pub fn jpeg_quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(format) = &overrides.format {
            self.format = format.clone();
        }
        if let Some(ratio) = overrides.custom_ratio {
            self.custom_ratio = ratio;
            // A ratio on the command line only makes sense for custom crops.
            if overrides.format.is_none() {
                self.format = format::CUSTOM_ID.to_string();
            }
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if overrides.recursive {
            self.recursive = true;
        }
    }
}

/// Values given on the command line. `None` leaves the config value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<String>,
    pub custom_ratio: Option<[f64; 2]>,
    pub quality: Option<u32>,
    pub output_dir: Option<String>,
    pub recursive: bool,
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CropConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. Returns `Ok(None)` if it does
/// not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults and deserialize.
///
/// Validation is left to the caller so command-line overrides can be
/// applied first.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CropConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load the run config.
///
/// An explicit `path` must exist; without one, `papercrop.toml` in `dir` is
/// used when present. Overrides are applied on top and the result is
/// validated.
pub fn load_config(
    path: Option<&Path>,
    dir: &Path,
    overrides: &Overrides,
) -> Result<CropConfig, ConfigError> {
    let overlay = match path {
        Some(p) => Some(toml::from_str(&fs::read_to_string(p)?)?),
        None => load_raw_config(&dir.join(CONFIG_FILE_NAME))?,
    };
    let mut config = resolve_config(overlay)?;
    config.apply(overrides);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `papercrop.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# papercrop configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# papercrop reads ./papercrop.toml, or the file passed with --config.
# Command-line flags override values set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Crop shape
# ---------------------------------------------------------------------------
# Target format. One of:
#   a4, a4-landscape, a3, a3-landscape, a5, a5-landscape,
#   letter, letter-landscape, square, custom
format = "a4"

# Width and height used when format = "custom".
custom_ratio = [1, 1]

# Crop unrecognized format ids to a square instead of failing.
allow_unknown_format = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
# JPEG quality (1 = worst, 100 = best).
quality = 90

# Directory the zip archive is written to.
output_dir = "."

# Archive file name is <archive_prefix>_<YYYY-MM-DDTHH-MM-SS>.zip
archive_prefix = "PaperCrop"

# ---------------------------------------------------------------------------
# Input
# ---------------------------------------------------------------------------
# Descend into subdirectories of directory arguments.
recursive = false
"##
}
