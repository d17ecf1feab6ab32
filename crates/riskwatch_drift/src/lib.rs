pub mod detector;
pub mod error;
pub mod ks;
pub mod pipeline;
pub mod psi;

pub use detector::DataDriftDetector;
pub use error::DriftError;
pub use pipeline::{monitor_drift_from_files, DatasetLoader};
