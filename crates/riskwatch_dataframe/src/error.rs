use riskwatch_drift::DriftError;
use riskwatch_types::error::TypeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFrameError {
    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read CSV {path}: {source}")]
    CsvError {
        path: PathBuf,
        source: arrow::error::ArrowError,
    },

    #[error("Invalid null pattern: {0}")]
    NullPatternError(#[from] regex::Error),

    #[error(transparent)]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("Failed to parse schema contract {path}: {source}")]
    ContractParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error(transparent)]
    TypeError(#[from] TypeError),
}

impl From<DataFrameError> for DriftError {
    fn from(err: DataFrameError) -> Self {
        match err {
            DataFrameError::SchemaError(message) => DriftError::SchemaError(message),
            other => DriftError::LoadError(other.to_string()),
        }
    }
}
