use crate::error::TypeError;
use crate::util::finite_or_null;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use strum_macros::EnumIter;

pub const PSI_MODERATE_THRESHOLD: f64 = 0.1;
pub const PSI_SIGNIFICANT_THRESHOLD: f64 = 0.2;

/// Descriptive statistics of one numeric column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnStatistics {
    #[serde(with = "finite_or_null")]
    pub mean: f64,

    #[serde(with = "finite_or_null")]
    pub std: f64,

    #[serde(with = "finite_or_null")]
    pub min: f64,

    #[serde(with = "finite_or_null")]
    pub max: f64,

    #[serde(with = "finite_or_null")]
    pub median: f64,

    #[serde(with = "finite_or_null")]
    pub q25: f64,

    #[serde(with = "finite_or_null")]
    pub q75: f64,
}

impl ColumnStatistics {
    /// Statistics of a column without a single observed value.
    pub fn undefined() -> Self {
        ColumnStatistics {
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
            q25: f64::NAN,
            q75: f64::NAN,
        }
    }
}

pub type FeatureStatistics = BTreeMap<String, ColumnStatistics>;

pub trait FeatureDriftResult {
    fn is_drifted(&self) -> bool;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KsFeatureResult {
    #[serde(with = "finite_or_null")]
    pub statistic: f64,

    #[serde(with = "finite_or_null")]
    pub p_value: f64,

    pub is_drifted: bool,

    pub threshold: f64,
}

impl KsFeatureResult {
    pub fn new(statistic: f64, p_value: f64, threshold: f64) -> Self {
        KsFeatureResult {
            statistic,
            p_value,
            is_drifted: p_value < threshold,
            threshold,
        }
    }
}

impl FeatureDriftResult for KsFeatureResult {
    fn is_drifted(&self) -> bool {
        self.is_drifted
    }
}

#[derive(Debug, EnumIter, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DriftLevel {
    None,
    Moderate,
    Significant,
}

impl DriftLevel {
    /// Severity band of a PSI value.
    pub fn from_psi(psi: f64) -> Self {
        if psi >= PSI_SIGNIFICANT_THRESHOLD {
            DriftLevel::Significant
        } else if psi >= PSI_MODERATE_THRESHOLD {
            DriftLevel::Moderate
        } else {
            DriftLevel::None
        }
    }

    pub fn is_drifted(&self) -> bool {
        !matches!(self, DriftLevel::None)
    }
}

impl FromStr for DriftLevel {
    type Err = TypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "none" => Ok(DriftLevel::None),
            "moderate" => Ok(DriftLevel::Moderate),
            "significant" => Ok(DriftLevel::Significant),
            _ => Err(TypeError::InvalidDriftLevelError(value.to_string())),
        }
    }
}

impl Display for DriftLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriftLevel::None => write!(f, "none"),
            DriftLevel::Moderate => write!(f, "moderate"),
            DriftLevel::Significant => write!(f, "significant"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PsiFeatureResult {
    #[serde(with = "finite_or_null")]
    pub psi: f64,

    pub drift_level: DriftLevel,

    pub is_drifted: bool,
}

impl PsiFeatureResult {
    pub fn new(psi: f64) -> Self {
        let drift_level = DriftLevel::from_psi(psi);

        PsiFeatureResult {
            psi,
            drift_level,
            is_drifted: drift_level.is_drifted(),
        }
    }
}

impl FeatureDriftResult for PsiFeatureResult {
    fn is_drifted(&self) -> bool {
        self.is_drifted
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureErrorKind {
    Schema,
    Computation,
}

/// A column that was selected for a drift test but produced no result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeatureError {
    pub kind: FeatureErrorKind,
    pub message: String,
}

impl FeatureError {
    pub fn schema(message: impl Into<String>) -> Self {
        FeatureError {
            kind: FeatureErrorKind::Schema,
            message: message.into(),
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        FeatureError {
            kind: FeatureErrorKind::Computation,
            message: message.into(),
        }
    }
}

/// Per-family summary over every column that produced a result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DriftTestSummary<T> {
    pub total_features: usize,
    pub drifted_features: usize,
    pub drift_percentage: f64,
    pub drifted_feature_names: Vec<String>,
    pub details: BTreeMap<String, T>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, FeatureError>,
}

impl<T> DriftTestSummary<T>
where
    T: FeatureDriftResult,
{
    /// Builds a summary from results in the order the columns were checked.
    pub fn from_results(results: Vec<(String, T)>, errors: BTreeMap<String, FeatureError>) -> Self {
        let drifted_feature_names: Vec<String> = results
            .iter()
            .filter(|(_, result)| result.is_drifted())
            .map(|(name, _)| name.clone())
            .collect();

        let total_features = results.len();
        let drifted_features = drifted_feature_names.len();

        DriftTestSummary {
            total_features,
            drifted_features,
            drift_percentage: drift_percentage(drifted_features, total_features),
            drifted_feature_names,
            details: results.into_iter().collect(),
            errors,
        }
    }
}

/// `drifted / total * 100`, defined as 0 when nothing was checked.
pub fn drift_percentage(drifted_features: usize, total_features: usize) -> f64 {
    if total_features == 0 {
        return 0.0;
    }
    drifted_features as f64 / total_features as f64 * 100.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatisticsComparison {
    pub reference: FeatureStatistics,
    pub current: FeatureStatistics,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DriftReport {
    pub timestamp: DateTime<Utc>,
    pub reference_samples: usize,
    pub current_samples: usize,
    pub ks_test: DriftTestSummary<KsFeatureResult>,
    pub psi_test: DriftTestSummary<PsiFeatureResult>,
    pub statistics_comparison: StatisticsComparison,
    pub overall_drift_detected: bool,
}

impl DriftReport {
    pub fn new(
        reference_samples: usize,
        current_samples: usize,
        ks_test: DriftTestSummary<KsFeatureResult>,
        psi_test: DriftTestSummary<PsiFeatureResult>,
        statistics_comparison: StatisticsComparison,
    ) -> Self {
        let overall_drift_detected = ks_test.drifted_features > 0 || psi_test.drifted_features > 0;

        DriftReport {
            timestamp: Utc::now(),
            reference_samples,
            current_samples,
            ks_test,
            psi_test,
            statistics_comparison,
            overall_drift_detected,
        }
    }
}
