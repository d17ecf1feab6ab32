use crate::error::DriftError;
use crate::ks::KsMonitor;
use crate::psi::PsiMonitor;
use ndarray::ArrayView1;
use riskwatch_profile::NumProfiler;
use riskwatch_types::{
    Dataset, DriftConfig, DriftReport, DriftTestSummary, FeatureDriftResult, FeatureError,
    FeatureStatistics, KsFeatureResult, PsiFeatureResult, ReportFuncs, StatisticsComparison,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Compares snapshots of a dataset against a fixed reference snapshot.
///
/// Reference statistics are computed once at construction. Every check reads
/// the reference and the current dataset without modifying either.
pub struct DataDriftDetector {
    reference: Dataset,
    config: DriftConfig,
    reference_statistics: FeatureStatistics,
    profiler: NumProfiler,
    ks_monitor: KsMonitor,
    psi_monitor: PsiMonitor,
}

impl DataDriftDetector {
    /// Creates a detector for the given reference dataset.
    ///
    /// # Arguments
    ///
    /// * `reference` - Baseline dataset; must contain at least one numeric column
    /// * `config` - Detector parameters
    ///
    /// # Errors
    ///
    /// `DriftError::ConfigurationError` when the config is out of range or the
    /// reference has no numeric column
    pub fn new(reference: Dataset, config: DriftConfig) -> Result<Self, DriftError> {
        config
            .validate()
            .map_err(|e| DriftError::ConfigurationError(e.to_string()))?;

        if reference.numeric_features().is_empty() {
            return Err(DriftError::ConfigurationError(
                "reference dataset has no numeric columns".to_string(),
            ));
        }

        let profiler = NumProfiler::new();
        let reference_statistics = profiler.compute_statistics(&reference)?;

        info!(
            "Drift detector initialized with {} reference samples and {} numeric features",
            reference.n_rows(),
            reference_statistics.len()
        );

        Ok(DataDriftDetector {
            reference,
            config,
            reference_statistics,
            profiler,
            ks_monitor: KsMonitor::new(),
            psi_monitor: PsiMonitor::new(),
        })
    }

    pub fn reference(&self) -> &Dataset {
        &self.reference
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn reference_statistics(&self) -> &FeatureStatistics {
        &self.reference_statistics
    }

    /// Two-sample KS test for every selected column.
    ///
    /// # Arguments
    ///
    /// * `current` - Dataset to compare against the reference
    /// * `columns` - Columns to check, in order; defaults to the reference's numeric columns
    pub fn detect_drift_ks_test(
        &self,
        current: &Dataset,
        columns: Option<&[String]>,
    ) -> Result<DriftTestSummary<KsFeatureResult>, DriftError> {
        let threshold = self.config.threshold;

        let summary = self.run_feature_checks("KS", current, columns, |feature, reference, current| {
            self.ks_monitor
                .compute_feature_drift(feature, reference, current, threshold)
        })?;

        info!(
            "KS test: {} of {} features drifted",
            summary.drifted_features, summary.total_features
        );

        Ok(summary)
    }

    /// PSI check for every selected column, with bins derived from the reference.
    ///
    /// # Arguments
    ///
    /// * `current` - Dataset to compare against the reference
    /// * `columns` - Columns to check, in order; defaults to the reference's numeric columns
    /// * `bins` - Number of bins, at least 1
    pub fn detect_drift_psi(
        &self,
        current: &Dataset,
        columns: Option<&[String]>,
        bins: usize,
    ) -> Result<DriftTestSummary<PsiFeatureResult>, DriftError> {
        if bins < 1 {
            return Err(DriftError::ConfigurationError(
                "PSI requires at least 1 bin".to_string(),
            ));
        }

        let strategy = &self.config.binning_strategy;

        let summary = self.run_feature_checks("PSI", current, columns, |feature, reference, current| {
            self.psi_monitor
                .compute_feature_drift(feature, reference, current, bins, strategy)
        })?;

        info!(
            "PSI test: {} of {} features drifted",
            summary.drifted_features, summary.total_features
        );

        Ok(summary)
    }

    /// Runs both drift tests over the default columns and assembles a report.
    pub fn generate_drift_report(&self, current: &Dataset) -> Result<DriftReport, DriftError> {
        let ks_test = self.detect_drift_ks_test(current, None)?;
        let psi_test = self.detect_drift_psi(current, None, self.config.psi_bins)?;

        let statistics_comparison = StatisticsComparison {
            reference: self.reference_statistics.clone(),
            current: self.profiler.compute_statistics(current)?,
        };

        let report = DriftReport::new(
            self.reference.n_rows(),
            current.n_rows(),
            ks_test,
            psi_test,
            statistics_comparison,
        );

        if report.overall_drift_detected {
            warn!(
                "Data drift detected. KS drifted features: {:?}, PSI drifted features: {:?}",
                report.ks_test.drifted_feature_names, report.psi_test.drifted_feature_names
            );
        } else {
            info!("No data drift detected across {} features", self.reference_statistics.len());
        }

        Ok(report)
    }

    /// Writes a report as pretty JSON, creating parent directories as needed.
    pub fn save_report(report: &DriftReport, path: &Path) -> Result<(), DriftError> {
        ReportFuncs::save_to_json(report, path)?;
        Ok(())
    }

    fn selected_columns(&self, columns: Option<&[String]>) -> Vec<String> {
        match columns {
            Some(columns) => columns.to_vec(),
            None => self.reference.numeric_features(),
        }
    }

    /// Applies `compute` to every selected column present in both datasets.
    ///
    /// Columns missing from either dataset are skipped. Columns that cannot be
    /// compared are recorded in the summary's `errors`, or abort the whole
    /// check when the detector is strict.
    fn run_feature_checks<T, F>(
        &self,
        test_name: &str,
        current: &Dataset,
        columns: Option<&[String]>,
        mut compute: F,
    ) -> Result<DriftTestSummary<T>, DriftError>
    where
        T: FeatureDriftResult,
        F: FnMut(&str, &ArrayView1<f64>, &ArrayView1<f64>) -> Result<T, DriftError>,
    {
        let mut results: Vec<(String, T)> = Vec::new();
        let mut errors: BTreeMap<String, FeatureError> = BTreeMap::new();

        for feature in self.selected_columns(columns) {
            if !current.has_column(&feature) {
                warn!(
                    "Column {} not found in current data, skipping {} test",
                    feature, test_name
                );
                continue;
            }

            if !self.reference.has_column(&feature) {
                warn!(
                    "Column {} not found in reference data, skipping {} test",
                    feature, test_name
                );
                continue;
            }

            let (reference_values, current_values) =
                match (self.reference.dropna(&feature), current.dropna(&feature)) {
                    (Some(reference_values), Some(current_values)) => {
                        (reference_values, current_values)
                    }
                    _ => {
                        let message = format!("column {feature} is not numeric in both datasets");
                        if self.config.strict {
                            return Err(DriftError::SchemaError(message));
                        }
                        warn!("{} test skipped: {}", test_name, message);
                        errors.insert(feature, FeatureError::schema(message));
                        continue;
                    }
                };

            match compute(&feature, &reference_values.view(), &current_values.view()) {
                Ok(result) => {
                    debug!(
                        "{} test for {}: drifted = {}",
                        test_name,
                        feature,
                        result.is_drifted()
                    );
                    results.push((feature, result));
                }
                Err(DriftError::ComputationError { feature, message }) if !self.config.strict => {
                    warn!("{} test failed for {}: {}", test_name, feature, message);
                    errors.insert(feature, FeatureError::computation(message));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(DriftTestSummary::from_results(results, errors))
    }
}
