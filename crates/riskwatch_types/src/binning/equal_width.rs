use crate::error::TypeError;
use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};

/// Equal-width histogram edges spanning the observed `[min, max]` range.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct EqualWidthBinning {
    pub num_bins: usize,
}

impl Default for EqualWidthBinning {
    fn default() -> Self {
        EqualWidthBinning { num_bins: 10 }
    }
}

impl EqualWidthBinning {
    pub fn new(num_bins: usize) -> Self {
        EqualWidthBinning { num_bins }
    }

    /// Computes `num_bins + 1` edges, first edge at the minimum and last edge at the maximum.
    ///
    /// A constant array has no width to split, so the range is widened to
    /// `[value - 0.5, value + 0.5]` before slicing it into bins.
    ///
    /// # Arguments
    /// * `arr` - Finite values to bin
    ///
    /// # Returns
    /// * `Ok(Vec<F>)` - Monotonically increasing edges
    pub fn compute_edges<F>(&self, arr: &ArrayView1<F>) -> Result<Vec<F>, TypeError>
    where
        F: Float + FromPrimitive,
    {
        if self.num_bins < 1 {
            return Err(TypeError::InvalidBinCountError(format!(
                "At least 1 bin is needed, got {}",
                self.num_bins
            )));
        }

        let mut min_val = *arr.min()?;
        let mut max_val = *arr.max()?;

        if min_val == max_val {
            let half = F::from_f64(0.5).unwrap_or_else(F::one);
            min_val = min_val - half;
            max_val = max_val + half;
        }

        let num_bins = F::from_usize(self.num_bins).ok_or_else(|| {
            TypeError::InvalidBinCountError(format!("Bin count {} overflows", self.num_bins))
        })?;
        let bin_width = (max_val - min_val) / num_bins;

        let mut edges = (0..self.num_bins)
            .map(|i| min_val + bin_width * F::from_usize(i).unwrap_or_else(F::zero))
            .collect::<Vec<F>>();
        edges.push(max_val);

        Ok(edges)
    }
}
