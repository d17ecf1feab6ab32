pub mod drift;
pub mod error;

pub use drift::{DriftSettings, DriftSettingsOverlay};
pub use error::ConfigError;
