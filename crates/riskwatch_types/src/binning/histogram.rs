use ndarray::ArrayView1;
use num_traits::Float;

/// Counts values per bin for the given edges.
///
/// Every bin is half-open `[edges[i], edges[i + 1])` except the last, which also
/// holds values equal to the final edge. Values outside `[edges[0], edges[n]]`
/// and NaN are not counted.
pub fn histogram<F>(arr: &ArrayView1<F>, edges: &[F]) -> Vec<usize>
where
    F: Float,
{
    let num_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; num_bins];

    if num_bins == 0 {
        return counts;
    }

    let first = edges[0];
    let last = edges[num_bins];

    for &value in arr.iter() {
        if !(value >= first && value <= last) {
            continue;
        }

        // index of the last edge <= value; repeated edges resolve to the right-most
        let idx = edges.partition_point(|&edge| edge <= value) - 1;
        counts[idx.min(num_bins - 1)] += 1;
    }

    counts
}
