use crate::error::DataProfileError;
use ndarray::prelude::*;
use ndarray_stats::{interpolate::Linear, QuantileExt};
use noisy_float::types::n64;
use riskwatch_types::{ColumnStatistics, Dataset, FeatureStatistics};
use tracing::debug;

/// Summarizes numeric columns of a dataset snapshot.
#[derive(Default)]
pub struct NumProfiler {}

impl NumProfiler {
    pub fn new() -> Self {
        NumProfiler {}
    }

    /// Compute a quantile of a 1D array using linear interpolation between
    /// the two closest ranks.
    ///
    /// # Arguments
    ///
    /// * `feature` - Feature name, used for error reporting
    /// * `array` - A 1D array without missing values
    /// * `quantile` - Quantile in `[0, 1]`
    pub fn compute_quantile(
        &self,
        feature: &str,
        array: &ArrayView1<f64>,
        quantile: f64,
    ) -> Result<f64, DataProfileError> {
        let value = array
            .to_owned()
            .quantile_axis_skipnan_mut(Axis(0), n64(quantile), &Linear)
            .map_err(|source| DataProfileError::QuantileError {
                feature: feature.to_string(),
                quantile,
                source,
            })?;

        Ok(value.into_scalar())
    }

    /// Compute the base statistics for a 1D array of observed values.
    ///
    /// The standard deviation is the sample estimate (`ddof = 1`), so a single
    /// observation yields NaN. An empty array yields all-NaN statistics.
    ///
    /// # Arguments
    ///
    /// * `feature` - Feature name
    /// * `array` - A 1D array without missing values
    ///
    /// # Returns
    ///
    /// The column statistics record
    pub fn compute_stats(
        &self,
        feature: &str,
        array: &ArrayView1<f64>,
    ) -> Result<ColumnStatistics, DataProfileError> {
        if array.is_empty() {
            debug!("Feature {} has no observed values", feature);
            return Ok(ColumnStatistics::undefined());
        }

        let mean = array.mean().ok_or(DataProfileError::MeanError)?;
        let std = if array.len() > 1 {
            array.std(1.0)
        } else {
            f64::NAN
        };

        Ok(ColumnStatistics {
            mean,
            std,
            min: *array.min()?,
            max: *array.max()?,
            median: self.compute_quantile(feature, array, 0.5)?,
            q25: self.compute_quantile(feature, array, 0.25)?,
            q75: self.compute_quantile(feature, array, 0.75)?,
        })
    }

    /// Compute statistics for every numeric column of a dataset, dropping
    /// missing values column by column.
    pub fn compute_statistics(&self, data: &Dataset) -> Result<FeatureStatistics, DataProfileError> {
        let mut statistics = FeatureStatistics::new();

        for feature in data.numeric_features() {
            let values = data.dropna(&feature).unwrap_or_default();
            let stats = self.compute_stats(&feature, &values.view())?;
            statistics.insert(feature, stats);
        }

        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::relative_eq;
    use ndarray::Array;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use riskwatch_types::Column;

    #[test]
    fn test_known_values() {
        let profiler = NumProfiler::new();
        let array = Array1::from_iter((1..=10).map(f64::from));

        let stats = profiler.compute_stats("x", &array.view()).unwrap();

        assert!(relative_eq!(stats.mean, 5.5));
        assert!(relative_eq!(stats.std, 3.0276503540974917, epsilon = 1e-12));
        assert!(relative_eq!(stats.min, 1.0));
        assert!(relative_eq!(stats.max, 10.0));
        assert!(relative_eq!(stats.median, 5.5));
        assert!(relative_eq!(stats.q25, 3.25));
        assert!(relative_eq!(stats.q75, 7.75));
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let profiler = NumProfiler::new();
        let array = Array1::from(vec![4.0]);

        let stats = profiler.compute_stats("x", &array.view()).unwrap();

        assert_eq!(stats.mean, 4.0);
        assert!(stats.std.is_nan());
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.q25, 4.0);
    }

    #[test]
    fn test_dataset_statistics_skip_missing_and_text() {
        let data = Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0), None, Some(3.0)]),
            Column::numeric("empty", vec![None, None, None]),
            Column::text("node", vec![Some("a".into()), Some("b".into()), None]),
        ])
        .unwrap();

        let statistics = NumProfiler::new().compute_statistics(&data).unwrap();

        assert_eq!(statistics.len(), 2);
        assert_eq!(statistics["x"].mean, 2.0);
        assert_eq!(statistics["x"].max, 3.0);
        assert!(statistics["empty"].mean.is_nan());
        assert!(!statistics.contains_key("node"));
    }

    #[test]
    fn test_uniform_quantiles() {
        let mut rng = StdRng::seed_from_u64(11);
        let array = Array::random_using(5000, Uniform::new(0., 1.), &mut rng);
        let stats = NumProfiler::new().compute_stats("u", &array.view()).unwrap();

        assert!(relative_eq!(stats.mean, 0.5, epsilon = 0.05));
        assert!(relative_eq!(stats.q25, 0.25, epsilon = 0.05));
        assert!(relative_eq!(stats.median, 0.5, epsilon = 0.05));
        assert!(relative_eq!(stats.q75, 0.75, epsilon = 0.05));
    }

    #[test]
    fn test_infinite_values_are_kept() {
        let data = Dataset::from_numeric(vec![("x", vec![1.0, 2.0, f64::INFINITY])]).unwrap();

        let statistics = NumProfiler::new().compute_statistics(&data).unwrap();
        let stats = &statistics["x"];

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, f64::INFINITY);
        assert_eq!(stats.mean, f64::INFINITY);
        assert_eq!(stats.median, 2.0);
        assert!(stats.std.is_nan());
    }
}
