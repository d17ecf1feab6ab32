use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataProfileError {
    #[error("Failed to calculate mean")]
    MeanError,

    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),

    #[error("Failed to compute quantile {quantile} for feature {feature}: {source}")]
    QuantileError {
        feature: String,
        quantile: f64,
        source: ndarray_stats::errors::QuantileError,
    },
}
