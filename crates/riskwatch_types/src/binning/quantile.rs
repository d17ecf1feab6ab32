use crate::error::TypeError;
use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct QuantileBinning {
    pub num_bins: usize,
}

impl Default for QuantileBinning {
    fn default() -> Self {
        QuantileBinning { num_bins: 10 }
    }
}

impl QuantileBinning {
    pub fn new(num_bins: usize) -> Self {
        QuantileBinning { num_bins }
    }

    /// Computes edges at the `i / num_bins` quantiles, `i = 0..=num_bins`, using the
    /// R-7 definition (Hyndman & Fan Type 7):
    ///
    /// - h = (n - 1) * p
    /// - Q(p) = x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])
    ///
    /// Tied values can produce repeated edges; the bins between them stay empty.
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

        if arr.is_empty() {
            return Err(TypeError::EmptyArrayError(
                "unable to compute quantile edges".to_string(),
            ));
        }

        let mut data: Vec<F> = arr.to_vec();
        data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let last = data.len() - 1;

        let edges = (0..=self.num_bins)
            .map(|i| {
                let h = last as f64 * (i as f64 / self.num_bins as f64);
                let lower = h.floor() as usize;
                let upper = (lower + 1).min(last);
                let fraction = F::from_f64(h - lower as f64).unwrap_or_else(F::zero);

                data[lower] + fraction * (data[upper] - data[lower])
            })
            .collect();

        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    #[test]
    fn test_quartiles_simple_case() {
        let binning = QuantileBinning::new(4);
        let data = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let edges = binning.compute_edges(&data.view()).unwrap();

        assert_eq!(edges.len(), 5);
        assert_abs_diff_eq!(edges[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(edges[1], 2.75, epsilon = 1e-10);
        assert_abs_diff_eq!(edges[2], 4.5, epsilon = 1e-10);
        assert_abs_diff_eq!(edges[3], 6.25, epsilon = 1e-10);
        assert_abs_diff_eq!(edges[4], 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_unsorted_data_produces_monotonic_edges() {
        let binning = QuantileBinning::new(5);
        let data = Array1::from(vec![
            12.0, 8.0, 17.0, 33.0, 123.0, 6.0, 9.23, 123.43, 1.9, 4.0, 11.0, 2.0, 5.6,
        ]);
        let edges = binning.compute_edges(&data.view()).unwrap();

        assert_eq!(edges.len(), 6);
        for window in edges.windows(2) {
            assert!(window[1] >= window[0], "edges must not decrease: {edges:?}");
        }
    }

    #[test]
    fn test_empty_array() {
        let binning = QuantileBinning::default();
        let data = Array1::<f64>::from(vec![]);

        assert!(matches!(
            binning.compute_edges(&data.view()),
            Err(TypeError::EmptyArrayError(_))
        ));
    }
}
