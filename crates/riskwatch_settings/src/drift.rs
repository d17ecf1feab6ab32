use crate::error::ConfigError;
use riskwatch_types::binning::BinningStrategy;
use riskwatch_types::{DriftConfig, DEFAULT_DRIFT_THRESHOLD, DEFAULT_PSI_BINS};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const THRESHOLD_ENV: &str = "RISKWATCH_DRIFT_THRESHOLD";
pub const PSI_BINS_ENV: &str = "RISKWATCH_PSI_BINS";
pub const BINNING_ENV: &str = "RISKWATCH_BINNING";
pub const STRICT_ENV: &str = "RISKWATCH_STRICT";
pub const REPORT_PATH_ENV: &str = "RISKWATCH_REPORT_PATH";

pub const DEFAULT_REPORT_PATH: &str = "reports/drift_report.json";

/// Settings of a drift run.
///
/// Resolution order, lowest to highest: built-in defaults, environment
/// variables, a YAML settings file, then explicit overrides such as CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftSettings {
    pub threshold: f64,
    pub psi_bins: usize,
    pub binning_strategy: BinningStrategy,
    pub strict: bool,
    pub report_path: PathBuf,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DRIFT_THRESHOLD,
            psi_bins: DEFAULT_PSI_BINS,
            binning_strategy: BinningStrategy::default(),
            strict: false,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

/// Partial settings read from a YAML file. Absent keys leave the current
/// value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DriftSettingsOverlay {
    pub threshold: Option<f64>,
    pub psi_bins: Option<usize>,
    pub binning_strategy: Option<BinningStrategy>,
    pub strict: Option<bool>,
    pub report_path: Option<PathBuf>,
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::EnvVarError {
                key: key.to_string(),
                value: value.clone(),
                message: e.to_string(),
            }),
    }
}

fn parse_bool(key: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::EnvVarError {
                key: key.to_string(),
                value,
                message: "expected a boolean".to_string(),
            }),
        },
    }
}

impl DriftSettings {
    /// Defaults overridden by the `RISKWATCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overlay = DriftSettingsOverlay {
            threshold: parse_var(THRESHOLD_ENV, lookup(THRESHOLD_ENV))?,
            psi_bins: parse_var(PSI_BINS_ENV, lookup(PSI_BINS_ENV))?,
            binning_strategy: parse_var(BINNING_ENV, lookup(BINNING_ENV))?,
            strict: parse_bool(STRICT_ENV, lookup(STRICT_ENV))?,
            report_path: lookup(REPORT_PATH_ENV).map(PathBuf::from),
        };

        Ok(Self::default().merge(overlay))
    }

    /// Environment settings, overlaid with a YAML file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = Self::from_env()?;

        match path {
            Some(path) => Ok(settings.merge(DriftSettingsOverlay::from_yaml_file(path)?)),
            None => Ok(settings),
        }
    }

    /// Replaces every field the overlay sets.
    pub fn merge(mut self, overlay: DriftSettingsOverlay) -> Self {
        if let Some(threshold) = overlay.threshold {
            self.threshold = threshold;
        }
        if let Some(psi_bins) = overlay.psi_bins {
            self.psi_bins = psi_bins;
        }
        if let Some(binning_strategy) = overlay.binning_strategy {
            self.binning_strategy = binning_strategy;
        }
        if let Some(strict) = overlay.strict {
            self.strict = strict;
        }
        if let Some(report_path) = overlay.report_path {
            self.report_path = report_path;
        }
        self
    }

    /// Validated detector parameters.
    pub fn to_drift_config(&self) -> Result<DriftConfig, ConfigError> {
        let config = DriftConfig::default()
            .with_threshold(self.threshold)
            .with_psi_bins(self.psi_bins)
            .with_binning_strategy(self.binning_strategy)
            .with_strict(self.strict);

        config
            .validate()
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;

        Ok(config)
    }
}

impl DriftSettingsOverlay {
    pub fn from_yaml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded drift settings from {}", path.display());
        Self::from_yaml_str(path, &content)
    }
}
