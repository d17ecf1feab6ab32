use crate::binning::BinningStrategy;
use crate::error::TypeError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DRIFT_THRESHOLD: f64 = 0.05;
pub const DEFAULT_PSI_BINS: usize = 10;

/// Parameters of a drift detector.
///
/// * `threshold` - KS p-value below which a column is drifted
/// * `psi_bins` - Number of PSI bins derived from the reference sample
/// * `binning_strategy` - How the PSI bin edges are placed
/// * `strict` - Abort the whole check on the first column that cannot be computed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriftConfig {
    pub threshold: f64,
    pub psi_bins: usize,
    pub binning_strategy: BinningStrategy,
    pub strict: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        DriftConfig {
            threshold: DEFAULT_DRIFT_THRESHOLD,
            psi_bins: DEFAULT_PSI_BINS,
            binning_strategy: BinningStrategy::default(),
            strict: false,
        }
    }
}

impl DriftConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_psi_bins(mut self, psi_bins: usize) -> Self {
        self.psi_bins = psi_bins;
        self
    }

    pub fn with_binning_strategy(mut self, binning_strategy: BinningStrategy) -> Self {
        self.binning_strategy = binning_strategy;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Checks that the threshold lies in (0, 1) and at least one bin is requested.
    pub fn validate(&self) -> Result<(), TypeError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(TypeError::InvalidParameterError(format!(
                "threshold must be in (0, 1), got {}",
                self.threshold
            )));
        }

        if self.psi_bins < 1 {
            return Err(TypeError::InvalidBinCountError(format!(
                "psi_bins must be at least 1, got {}",
                self.psi_bins
            )));
        }

        Ok(())
    }
}
