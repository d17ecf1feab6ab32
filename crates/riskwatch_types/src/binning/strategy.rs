use crate::binning::equal_width::EqualWidthBinning;
use crate::binning::quantile::QuantileBinning;
use crate::error::TypeError;
use ndarray::{Array1, ArrayView1};
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How PSI bin edges are derived from the reference sample.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinningStrategy {
    #[default]
    EqualWidth,
    Quantile,
}

impl BinningStrategy {
    pub fn compute_edges<F>(&self, arr: &ArrayView1<F>, num_bins: usize) -> Result<Vec<F>, TypeError>
    where
        F: Float + FromPrimitive,
    {
        let clean_arr = Array1::from(
            arr.iter()
                .filter(|&&x| x.is_finite())
                .cloned()
                .collect::<Vec<F>>(),
        );

        if clean_arr.is_empty() {
            return Err(TypeError::EmptyArrayError(
                "unable to compute bin edges".to_string(),
            ));
        }

        match self {
            BinningStrategy::EqualWidth => {
                EqualWidthBinning::new(num_bins).compute_edges(&clean_arr.view())
            }
            BinningStrategy::Quantile => {
                QuantileBinning::new(num_bins).compute_edges(&clean_arr.view())
            }
        }
    }
}

impl FromStr for BinningStrategy {
    type Err = TypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "equal_width" => Ok(BinningStrategy::EqualWidth),
            "quantile" => Ok(BinningStrategy::Quantile),
            _ => Err(TypeError::InvalidBinningStrategyError(value.to_string())),
        }
    }
}

impl Display for BinningStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningStrategy::EqualWidth => write!(f, "equal_width"),
            BinningStrategy::Quantile => write!(f, "quantile"),
        }
    }
}
