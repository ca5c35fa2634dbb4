//! INI configuration shared by both binaries.
//!
//! ```ini
//! [Paths]
//! jsonl_directory = data/conversations
//! output_file = data/final_dataset.jsonl
//!
//! [Weights]
//! category_weights = {"positive": 0.5, "negative": 0.3, "neutral": 0.2}
//!
//! [Settings]
//! total_examples = 1000
//! ```

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use serde_json::Value;

use crate::error::{DatasetError, Result};
use crate::sampler::WeightSpec;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Everything the dataset build needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub jsonl_directory: PathBuf,
    pub output_file: PathBuf,
    pub category_weights: WeightSpec,
    pub total_examples: usize,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub log_directory: PathBuf,
}

/// What the evaluator needs: just the dataset to read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub output_file: PathBuf,
    pub log_directory: PathBuf,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_ini(&read_ini(path)?)
    }

    pub fn from_ini(conf: &Ini) -> Result<Self> {
        let weights_raw = required(conf, "Weights", "category_weights")?;
        let total_raw = required(conf, "Settings", "total_examples")?;

        let total_examples = total_raw.trim().parse::<usize>().map_err(|e| {
            DatasetError::config("Settings.total_examples", format!("{total_raw:?}: {e}"))
        })?;
        let seed = optional(conf, "Settings", "seed")
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| DatasetError::config("Settings.seed", format!("{s:?}: {e}")))
            })
            .transpose()?;

        Ok(Self {
            jsonl_directory: required(conf, "Paths", "jsonl_directory")?.into(),
            output_file: required(conf, "Paths", "output_file")?.into(),
            category_weights: parse_weights(weights_raw)?,
            total_examples,
            seed,
            log_directory: log_directory(conf),
        })
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_ini(&read_ini(path)?)
    }

    pub fn from_ini(conf: &Ini) -> Result<Self> {
        Ok(Self {
            output_file: required(conf, "Paths", "output_file")?.into(),
            log_directory: log_directory(conf),
        })
    }
}

pub fn read_ini(path: &Path) -> Result<Ini> {
    Ini::load_from_file_opt(path, parse_option())
        .map_err(|e| DatasetError::config(&path.display().to_string(), e.to_string()))
}

/// Quotes and backslashes stay literal so the weight map survives as JSON;
/// indented continuation lines let it span several lines.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

/// Parse the `category_weights` JSON object literal.
///
/// Every value must be a non-negative number. The weights are not required
/// to sum to one.
pub fn parse_weights(raw: &str) -> Result<WeightSpec> {
    const KEY: &str = "Weights.category_weights";

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DatasetError::config(KEY, format!("invalid JSON: {e}")))?;
    let Value::Object(map) = value else {
        return Err(DatasetError::config(KEY, "expected a JSON object"));
    };

    let mut weights = WeightSpec::new();
    for (category, w) in map {
        let Some(weight) = w.as_f64() else {
            return Err(DatasetError::config(
                KEY,
                format!("weight for {category:?} is not a number: {w}"),
            ));
        };
        if !weight.is_finite() || weight < 0.0 {
            return Err(DatasetError::config(
                KEY,
                format!("weight for {category:?} must be a non-negative number, got {weight}"),
            ));
        }
        weights.insert(category, weight);
    }
    Ok(weights)
}

fn optional<'a>(conf: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    conf.section(Some(section)).and_then(|s| s.get(key))
}

fn required<'a>(conf: &'a Ini, section: &str, key: &str) -> Result<&'a str> {
    optional(conf, section, key)
        .ok_or_else(|| DatasetError::config(&format!("{section}.{key}"), "missing"))
}

fn log_directory(conf: &Ini) -> PathBuf {
    optional(conf, "Paths", "log_directory")
        .unwrap_or(DEFAULT_LOG_DIR)
        .into()
}
