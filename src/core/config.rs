//! Run configuration
//!
//! The configuration surface consumed by the cascade is small: whether to
//! simulate sediment, where sediment parameters come from, and how the
//! output is named. It can be read from a JSON file and then overridden
//! field by field from the command line.

use super::error::{Error, Result};
use crate::table::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Downstream value marking a network outlet in routing files
pub const DEFAULT_SENTINEL: i64 = -999;

/// Result file name used when none is given
pub const DEFAULT_OUTPUT_NAME: &str = "result_discharge";

/// Extension of the result file
pub const OUTPUT_EXTENSION: &str = "dat";

/// Where sediment density and retention efficiency come from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SedimentParamMode {
    /// Per-subbasin values from the sediment parameter file
    #[default]
    File,
    /// One global pair of values
    Manual {
        /// Dry bulk density of the dam material (g/cm³)
        density: Option<f64>,
        /// Retention efficiency as a percentage (50 means 0.50)
        efficiency_percent: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub simulate_sediment: bool,
    pub sediment_params: SedimentParamMode,
    pub output_name: String,
    pub downstream_sentinel: i64,
    pub load: LoadOptions,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            simulate_sediment: false,
            sediment_params: SedimentParamMode::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            downstream_sentinel: DEFAULT_SENTINEL,
            load: LoadOptions::default(),
        }
    }
}

impl CascadeConfig {
    /// Reads a configuration from a JSON file. Absent fields keep their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let to_error = |source: Box<dyn std::error::Error + Send + Sync>| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| to_error(Box::new(e)))?;
        serde_json::from_str(&text).map_err(|e| to_error(Box::new(e)))
    }

    /// Path of the result file inside `dir`
    pub fn output_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        let name = if self.output_name.trim().is_empty() {
            DEFAULT_OUTPUT_NAME
        } else {
            self.output_name.trim()
        };
        dir.as_ref().join(format!("{name}.{OUTPUT_EXTENSION}"))
    }
}

/// Parses a manually entered density such as `1,5` or `1.5`.
///
/// Empty text means "use the default" and yields `None`.
pub fn parse_manual_density(text: &str) -> Result<Option<f64>> {
    parse_manual(text, "density")
}

/// Parses a manually entered efficiency percentage such as `50%`, `50` or
/// `50,5`. The returned value is still a percentage.
pub fn parse_manual_efficiency(text: &str) -> Result<Option<f64>> {
    parse_manual(&text.replace('%', ""), "efficiency")
}

fn parse_manual(text: &str, what: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| Error::Config(format!("invalid manual {what} value {text:?}")))
}
