//! Column statistics used by the reindexer and outlier filter.

use std::collections::BTreeMap;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Mean and standard deviation of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
}

impl ColumnStats {
    /// Computes the statistics, `None` below two values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            std: sample_std(values)?,
        })
    }

    /// Acceptance band `[|mean| − k·std, |mean| + k·std]`.
    pub fn magnitude_band(&self, k: f64) -> (f64, f64) {
        let centre = self.mean.abs();
        let half_width = k * self.std;
        (centre - half_width, centre + half_width)
    }

    /// Returns true if `|value|` lies inside [`ColumnStats::magnitude_band`].
    ///
    /// This compares magnitudes, not signed deviations: a value mirrored
    /// across zero from the mean is accepted.
    pub fn admits(&self, value: f64, k: f64) -> bool {
        let (low, high) = self.magnitude_band(k);
        let magnitude = value.abs();
        magnitude >= low && magnitude <= high
    }
}

/// Most frequent positive difference between consecutive indices.
///
/// Ties, including the case where every difference is distinct, resolve
/// to the smallest difference. Zero and negative steps (repeated frames,
/// video boundaries) are ignored. Returns `None` when no positive step
/// exists.
pub fn modal_interval(indices: &[u64]) -> Option<u64> {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for pair in indices.windows(2) {
        if pair[1] > pair[0] {
            *counts.entry(pair[1] - pair[0]).or_default() += 1;
        }
    }

    let mut best: Option<(u64, usize)> = None;
    for (delta, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((delta, count));
        }
    }
    best.map(|(delta, _)| delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sample_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        // Population std is 2; sample std is sqrt(32 / 7).
        let std = sample_std(&values).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_values() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert!(ColumnStats::from_values(&[1.0]).is_none());
    }

    #[test]
    fn test_magnitude_band_ignores_sign() {
        let stats = ColumnStats {
            mean: -97.7,
            std: 0.1,
        };
        assert!(stats.admits(-97.75, 2.0));
        assert!(stats.admits(97.75, 2.0));
        assert!(!stats.admits(-98.0, 2.0));
        assert!(!stats.admits(-97.0, 2.0));
    }

    #[test]
    fn test_modal_interval() {
        assert_eq!(modal_interval(&[0, 3, 6, 10, 13]), Some(3));
        assert_eq!(modal_interval(&[0, 5, 10, 15, 0, 5, 10]), Some(5));
    }

    #[test]
    fn test_modal_interval_tie_picks_smallest() {
        assert_eq!(modal_interval(&[0, 4, 6, 11]), Some(2));
        assert_eq!(modal_interval(&[0, 3, 6, 10, 14]), Some(3));
    }

    #[test]
    fn test_modal_interval_without_positive_steps() {
        assert_eq!(modal_interval(&[]), None);
        assert_eq!(modal_interval(&[4]), None);
        assert_eq!(modal_interval(&[4, 4, 2]), None);
    }
}
