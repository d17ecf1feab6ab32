use crate::error::DriftError;
use ndarray::ArrayView1;
use riskwatch_types::KsFeatureResult;
use std::cmp::Ordering;

// sqrt(2 * pi) and pi^2 / 8
const SQRT_TWO_PI: f64 = 2.256_758_334_191_025;
const PI_SQUARED_OVER_EIGHT: f64 = 1.233_700_550_136_17;

/// Two-sample Kolmogorov-Smirnov test.
#[derive(Default)]
pub struct KsMonitor {}

impl KsMonitor {
    pub fn new() -> Self {
        KsMonitor {}
    }

    fn sorted(array: &ArrayView1<f64>) -> Vec<f64> {
        let mut values = array.to_vec();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values
    }

    /// Maximum distance between the empirical CDFs of two samples.
    ///
    /// Both CDFs are evaluated at every value of the pooled sample, stepping
    /// past ties in both samples before measuring the gap.
    pub fn compute_statistic(&self, reference: &ArrayView1<f64>, current: &ArrayView1<f64>) -> f64 {
        let reference = Self::sorted(reference);
        let current = Self::sorted(current);

        let n1 = reference.len() as f64;
        let n2 = current.len() as f64;

        let (mut i, mut j) = (0usize, 0usize);
        let mut statistic: f64 = 0.0;

        while i < reference.len() && j < current.len() {
            let value = reference[i].min(current[j]);

            while i < reference.len() && reference[i] <= value {
                i += 1;
            }
            while j < current.len() && current[j] <= value {
                j += 1;
            }

            statistic = statistic.max((i as f64 / n1 - j as f64 / n2).abs());
        }

        statistic
    }

    /// Survival function of the Kolmogorov distribution, `Q(z) = P(K > z)`.
    pub fn kolmogorov_sf(z: f64) -> f64 {
        if z < 0.1 {
            return 1.0;
        }

        if z < 1.18 {
            let y = (-PI_SQUARED_OVER_EIGHT / (z * z)).exp();
            let cdf = SQRT_TWO_PI * (-y.ln()).sqrt() * (y + y.powi(9) + y.powi(25) + y.powi(49));
            (1.0 - cdf).clamp(0.0, 1.0)
        } else {
            let x = (-2.0 * z * z).exp();
            (2.0 * (x - x.powi(4) + x.powi(9))).clamp(0.0, 1.0)
        }
    }

    /// Asymptotic two-sided p-value with Stephens' small-sample correction.
    ///
    /// For small samples this differs from an exact two-sample distribution
    /// (scipy's `ks_2samp` in `auto` mode): ten values against ten disjoint
    /// values give about 1.9e-5 here against an exact 1.1e-5.
    pub fn p_value(statistic: f64, n1: usize, n2: usize) -> f64 {
        let (n1, n2) = (n1 as f64, n2 as f64);
        let effective_n = (n1 * n2 / (n1 + n2)).sqrt();
        let lambda = (effective_n + 0.12 + 0.11 / effective_n) * statistic;

        Self::kolmogorov_sf(lambda)
    }

    /// Runs the test for one feature. Both samples must already be free of
    /// missing values.
    pub fn compute_feature_drift(
        &self,
        feature: &str,
        reference: &ArrayView1<f64>,
        current: &ArrayView1<f64>,
        threshold: f64,
    ) -> Result<KsFeatureResult, DriftError> {
        if reference.is_empty() || current.is_empty() {
            return Err(DriftError::computation(
                feature,
                format!(
                    "KS statistic is undefined for an empty sample (reference: {}, current: {})",
                    reference.len(),
                    current.len()
                ),
            ));
        }

        let statistic = self.compute_statistic(reference, current);
        let p_value = Self::p_value(statistic, reference.len(), current.len());

        Ok(KsFeatureResult::new(statistic, p_value, threshold))
    }
}
