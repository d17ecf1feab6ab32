use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilError {
    #[error("Failed to serialize: {0}")]
    SerializeError(String),

    #[error("Failed to deserialize: {0}")]
    DeSerializeError(String),

    #[error("Failed to access {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl UtilError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UtilError::IoError {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Empty array: {0}")]
    EmptyArrayError(String),

    #[error("{0}")]
    InvalidParameterError(String),

    #[error("{0}")]
    InvalidBinCountError(String),

    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),

    #[error("Column {name} has {found} rows, expected {expected}")]
    ColumnLengthError {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumnError(String),

    #[error("Invalid binning strategy: {0}")]
    InvalidBinningStrategyError(String),

    #[error("Invalid drift level: {0}")]
    InvalidDriftLevelError(String),
}
