use crate::error::DriftError;
use ndarray::ArrayView1;
use riskwatch_types::binning::{histogram, BinningStrategy};
use riskwatch_types::PsiFeatureResult;

/// Fraction assigned to empty bins so the log-ratio stays finite.
pub const EMPTY_BIN_FRACTION: f64 = 0.0001;

/// Population Stability Index over bins derived from the reference sample.
#[derive(Default)]
pub struct PsiMonitor {}

impl PsiMonitor {
    pub fn new() -> Self {
        PsiMonitor {}
    }

    /// Share of the sample falling in each bin, with empty bins floored to
    /// [`EMPTY_BIN_FRACTION`]. Values outside the edges count toward the
    /// sample size but land in no bin.
    pub fn compute_bin_proportions(&self, array: &ArrayView1<f64>, edges: &[f64]) -> Vec<f64> {
        let sample_size = array.len() as f64;

        histogram(array, edges)
            .into_iter()
            .map(|count| {
                let proportion = count as f64 / sample_size;
                if proportion == 0.0 {
                    EMPTY_BIN_FRACTION
                } else {
                    proportion
                }
            })
            .collect()
    }

    /// PSI = sum over bins of (current - reference) * ln(current / reference).
    ///
    /// # Arguments
    ///
    /// * `proportion_pairs` - `(reference, current)` proportions per bin, both non-zero
    pub fn compute_psi(proportion_pairs: &[(f64, f64)]) -> f64 {
        proportion_pairs
            .iter()
            .map(|(reference, current)| (current - reference) * (current / reference).ln())
            .sum()
    }

    /// Runs the PSI check for one feature. Both samples must already be free
    /// of missing values.
    pub fn compute_feature_drift(
        &self,
        feature: &str,
        reference: &ArrayView1<f64>,
        current: &ArrayView1<f64>,
        num_bins: usize,
        binning_strategy: &BinningStrategy,
    ) -> Result<PsiFeatureResult, DriftError> {
        if reference.is_empty() || current.is_empty() {
            return Err(DriftError::computation(
                feature,
                format!(
                    "PSI is undefined for an empty sample (reference: {}, current: {})",
                    reference.len(),
                    current.len()
                ),
            ));
        }

        let edges = binning_strategy
            .compute_edges(reference, num_bins)
            .map_err(|e| DriftError::computation(feature, e.to_string()))?;

        let reference_proportions = self.compute_bin_proportions(reference, &edges);
        let current_proportions = self.compute_bin_proportions(current, &edges);

        let proportion_pairs = reference_proportions
            .into_iter()
            .zip(current_proportions)
            .collect::<Vec<(f64, f64)>>();

        Ok(PsiFeatureResult::new(PsiMonitor::compute_psi(
            &proportion_pairs,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array, Array1};
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::{Normal, Uniform};
    use ndarray_rand::RandomExt;
    use riskwatch_types::DriftLevel;

    #[test]
    fn test_compute_psi_basic() {
        let proportions = vec![(0.3, 0.2), (0.4, 0.4), (0.3, 0.4)];

        let result = PsiMonitor::compute_psi(&proportions);

        let expected_psi = (0.2 - 0.3) * (0.2_f64 / 0.3).ln()
            + 0.0
            + (0.4 - 0.3) * (0.4_f64 / 0.3).ln();

        assert_abs_diff_eq!(result, expected_psi, epsilon = 1e-12);
    }

    #[test]
    fn test_bin_proportions_floor_empty_bins() {
        let monitor = PsiMonitor::new();
        let data = Array1::from(vec![0.5, 0.6, 2.5, 9.0]);

        let proportions = monitor.compute_bin_proportions(&data.view(), &[0.0, 1.0, 2.0, 3.0]);

        assert_eq!(proportions, vec![0.5, EMPTY_BIN_FRACTION, 0.25]);
    }

    #[test]
    fn test_disjoint_ranges_are_significant() {
        let monitor = PsiMonitor::new();
        let reference = Array1::from_iter((1..=10).map(f64::from));
        let current = Array1::from_iter((101..=110).map(f64::from));

        let result = monitor
            .compute_feature_drift(
                "x",
                &reference.view(),
                &current.view(),
                10,
                &BinningStrategy::EqualWidth,
            )
            .unwrap();

        // every reference bin holds 10%, every current bin is floored
        let expected = 10.0 * (EMPTY_BIN_FRACTION - 0.1) * (EMPTY_BIN_FRACTION / 0.1).ln();
        assert_abs_diff_eq!(result.psi, expected, epsilon = 1e-9);
        assert_eq!(result.drift_level, DriftLevel::Significant);
        assert!(result.is_drifted);
    }

    #[test]
    fn test_identical_samples_have_zero_psi() {
        let monitor = PsiMonitor::new();
        let mut rng = StdRng::seed_from_u64(3);
        let reference = Array::random_using(1000, Normal::new(50.0, 5.0).unwrap(), &mut rng);

        for strategy in [BinningStrategy::EqualWidth, BinningStrategy::Quantile] {
            let result = monitor
                .compute_feature_drift("x", &reference.view(), &reference.view(), 10, &strategy)
                .unwrap();

            assert_abs_diff_eq!(result.psi, 0.0);
            assert_eq!(result.drift_level, DriftLevel::None);
        }
    }

    #[test]
    fn test_constant_reference_column() {
        let monitor = PsiMonitor::new();
        let reference = Array1::from(vec![7.0; 50]);
        let same = Array1::from(vec![7.0; 20]);
        let shifted = Array1::from(vec![9.0; 20]);

        let result = monitor
            .compute_feature_drift("x", &reference.view(), &same.view(), 10, &BinningStrategy::EqualWidth)
            .unwrap();
        assert_abs_diff_eq!(result.psi, 0.0);

        let result = monitor
            .compute_feature_drift(
                "x",
                &reference.view(),
                &shifted.view(),
                10,
                &BinningStrategy::EqualWidth,
            )
            .unwrap();
        assert_eq!(result.drift_level, DriftLevel::Significant);
    }

    #[test]
    fn test_psi_is_never_negative() {
        let monitor = PsiMonitor::new();
        let mut rng = StdRng::seed_from_u64(5);

        for shift in [0.0, 0.3, 1.0, 5.0] {
            let reference = Array::random_using(500, Uniform::new(0.0, 10.0), &mut rng);
            let current = Array::random_using(300, Uniform::new(shift, 10.0 + shift), &mut rng);

            for strategy in [BinningStrategy::EqualWidth, BinningStrategy::Quantile] {
                let result = monitor
                    .compute_feature_drift("x", &reference.view(), &current.view(), 10, &strategy)
                    .unwrap();
                assert!(result.psi >= 0.0, "negative psi {} for shift {shift}", result.psi);
            }
        }
    }

    #[test]
    fn test_infinite_values_count_toward_sample_size() {
        let monitor = PsiMonitor::new();
        let reference = Array1::from(vec![1.0, 2.0, 3.0, f64::INFINITY]);
        let current = Array1::from(vec![1.0, 2.0, 3.0, f64::NEG_INFINITY]);

        let edges = BinningStrategy::EqualWidth
            .compute_edges(&reference.view(), 2)
            .unwrap();
        assert_eq!(edges, vec![1.0, 2.0, 3.0]);

        let proportions = monitor.compute_bin_proportions(&current.view(), &edges);
        assert_eq!(proportions, vec![0.25, 0.5]);

        let result = monitor
            .compute_feature_drift("x", &reference.view(), &current.view(), 2, &BinningStrategy::EqualWidth)
            .unwrap();
        assert_abs_diff_eq!(result.psi, 0.0);
    }

    #[test]
    fn test_empty_current_sample() {
        let monitor = PsiMonitor::new();
        let reference = Array1::from(vec![1.0, 2.0]);
        let current = Array1::<f64>::from(vec![]);

        let result = monitor.compute_feature_drift(
            "x",
            &reference.view(),
            &current.view(),
            10,
            &BinningStrategy::EqualWidth,
        );

        assert!(matches!(result, Err(DriftError::ComputationError { .. })));
    }
}
