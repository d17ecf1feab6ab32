use crate::detector::DataDriftDetector;
use crate::error::DriftError;
use riskwatch_types::{Dataset, DriftConfig, DriftReport};
use std::path::Path;
use tracing::info;

/// Source of dataset snapshots for [`monitor_drift_from_files`].
pub trait DatasetLoader {
    fn load(&self, path: &Path) -> Result<Dataset, DriftError>;
}

/// Loads both snapshots, builds a drift report and writes it to `output_path`.
///
/// # Arguments
///
/// * `loader` - Reads a dataset from a path
/// * `reference_path` - Baseline snapshot
/// * `current_path` - Snapshot to compare against the baseline
/// * `output_path` - Destination of the JSON report
/// * `config` - Detector parameters
pub fn monitor_drift_from_files<L: DatasetLoader>(
    loader: &L,
    reference_path: &Path,
    current_path: &Path,
    output_path: &Path,
    config: DriftConfig,
) -> Result<DriftReport, DriftError> {
    info!("Loading reference data from {}", reference_path.display());
    let reference = loader.load(reference_path)?;

    info!("Loading current data from {}", current_path.display());
    let current = loader.load(current_path)?;

    let detector = DataDriftDetector::new(reference, config)?;
    let report = detector.generate_drift_report(&current)?;

    DataDriftDetector::save_report(&report, output_path)?;

    Ok(report)
}
