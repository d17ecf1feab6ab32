use riskwatch_profile::error::DataProfileError;
use riskwatch_types::error::{TypeError, UtilError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Invalid drift configuration: {0}")]
    ConfigurationError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Computation error for feature {feature}: {message}")]
    ComputationError { feature: String, message: String },

    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error(transparent)]
    ProfileError(#[from] DataProfileError),

    #[error(transparent)]
    UtilError(#[from] UtilError),

    #[error("Failed to load dataset: {0}")]
    LoadError(String),
}

impl DriftError {
    pub fn computation(feature: &str, message: impl Into<String>) -> Self {
        DriftError::ComputationError {
            feature: feature.to_string(),
            message: message.into(),
        }
    }
}
