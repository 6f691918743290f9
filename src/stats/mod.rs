//! Outlier filtering and descriptive statistics for latency samples

pub mod histogram;

pub use histogram::Histogram;

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Interquartile range bounds used to discard outliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Multiplier applied to the IQR
    pub factor: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute bounds from ascending values: `[Q1 - k·IQR, Q3 + k·IQR]`
    pub fn from_sorted(sorted: &[f64], factor: f64) -> Result<Self> {
        if sorted.is_empty() {
            return Err(AppError::statistics("Cannot compute quartiles of an empty sample"));
        }

        let q1 = percentile(sorted, 25.0);
        let q3 = percentile(sorted, 75.0);
        let iqr = q3 - q1;

        Ok(Self {
            q1,
            q3,
            iqr,
            factor,
            lower: q1 - factor * iqr,
            upper: q3 + factor * iqr,
        })
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Samples left after outlier removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredSamples {
    /// Values inside the bounds, in input order
    pub retained: Vec<u64>,
    /// Number of values before filtering
    pub original_count: usize,
    pub bounds: IqrBounds,
}

impl FilteredSamples {
    pub fn outlier_count(&self) -> usize {
        self.original_count - self.retained.len()
    }
}

/// Summary statistics of one dataset after outlier removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub total_frames: usize,
    pub outliers_removed: usize,
    pub valid_frames: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    /// Population standard deviation
    pub std_dev_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl LatencySummary {
    /// Summarize the retained values of a filtered sample
    pub fn from_filtered(filtered: &FilteredSamples) -> Result<Self> {
        let values = &filtered.retained;
        if values.is_empty() {
            return Err(AppError::statistics("No samples left after outlier removal"));
        }

        let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = mean(&sorted);
        let (min_ms, max_ms) = values
            .iter()
            .fold((u64::MAX, u64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        Ok(Self {
            total_frames: filtered.original_count,
            outliers_removed: filtered.outlier_count(),
            valid_frames: values.len(),
            mean_ms: mean,
            median_ms: percentile(&sorted, 50.0),
            std_dev_ms: population_std_dev(&sorted, mean),
            min_ms,
            max_ms,
        })
    }
}

/// Remove values outside `[Q1 - factor·IQR, Q3 + factor·IQR]`
pub fn filter_outliers(values: &[u64], factor: f64) -> Result<FilteredSamples> {
    if values.is_empty() {
        return Err(AppError::statistics("No latency samples to filter"));
    }

    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let bounds = IqrBounds::from_sorted(&sorted, factor)?;

    let retained = values
        .iter()
        .copied()
        .filter(|&v| bounds.contains(v as f64))
        .collect();

    Ok(FilteredSamples {
        retained,
        original_count: values.len(),
        bounds,
    })
}

/// Linear-interpolation percentile over ascending values (0..=100)
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation dividing by `n`
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_calculation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert_eq!(percentile(&values, 25.0), 2.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = vec![10.0, 20.0, 30.0, 40.0];
        // index = 0.25 * 3 = 0.75
        assert!((percentile(&values, 25.0) - 17.5).abs() < 1e-9);
        assert!((percentile(&values, 50.0) - 25.0).abs() < 1e-9);
        assert!((percentile(&values, 75.0) - 32.5).abs() < 1e-9);
    }

    #[test]
    fn test_iqr_bounds() {
        let sorted: Vec<f64> = (1..=9).map(f64::from).collect();
        let bounds = IqrBounds::from_sorted(&sorted, 1.5).unwrap();
        assert_eq!(bounds.q1, 3.0);
        assert_eq!(bounds.q3, 7.0);
        assert_eq!(bounds.iqr, 4.0);
        assert_eq!(bounds.lower, -3.0);
        assert_eq!(bounds.upper, 13.0);
        assert!(bounds.contains(13.0));
        assert!(!bounds.contains(13.01));
    }

    #[test]
    fn test_filter_removes_high_outlier() {
        let values = vec![10, 11, 12, 11, 10, 12, 11, 95];
        let filtered = filter_outliers(&values, 1.5).unwrap();
        assert_eq!(filtered.retained, vec![10, 11, 12, 11, 10, 12, 11]);
        assert_eq!(filtered.original_count, 8);
        assert_eq!(filtered.outlier_count(), 1);
    }

    #[test]
    fn test_filter_keeps_all_equal_values() {
        let values = vec![17; 25];
        let filtered = filter_outliers(&values, 1.5).unwrap();
        assert_eq!(filtered.bounds.iqr, 0.0);
        assert_eq!(filtered.retained.len(), 25);
        assert_eq!(filtered.outlier_count(), 0);
    }

    #[test]
    fn test_zero_iqr_drops_values_that_differ() {
        // Q1 = Q3 = 5, so only the 5s survive
        let values = vec![5, 5, 5, 5, 5, 5, 5, 9];
        let filtered = filter_outliers(&values, 1.5).unwrap();
        assert_eq!(filtered.retained, vec![5; 7]);
        assert_eq!(filtered.outlier_count(), 1);
    }

    #[test]
    fn test_single_value() {
        let filtered = filter_outliers(&[42], 1.5).unwrap();
        let summary = LatencySummary::from_filtered(&filtered).unwrap();
        assert_eq!(summary.total_frames, 1);
        assert_eq!(summary.valid_frames, 1);
        assert_eq!(summary.mean_ms, 42.0);
        assert_eq!(summary.median_ms, 42.0);
        assert_eq!(summary.std_dev_ms, 0.0);
        assert_eq!((summary.min_ms, summary.max_ms), (42, 42));
    }

    #[test]
    fn test_filter_empty_is_error() {
        let error = filter_outliers(&[], 1.5).unwrap_err();
        assert_eq!(error.category(), "STATS");
    }

    #[test]
    fn test_summary_values() {
        let values = vec![10, 20, 30, 40, 1000];
        let filtered = filter_outliers(&values, 1.5).unwrap();
        assert_eq!(filtered.retained, vec![10, 20, 30, 40]);

        let summary = LatencySummary::from_filtered(&filtered).unwrap();
        assert_eq!(summary.total_frames, 5);
        assert_eq!(summary.outliers_removed, 1);
        assert_eq!(summary.valid_frames, 4);
        assert_eq!(summary.mean_ms, 25.0);
        assert_eq!(summary.median_ms, 25.0);
        // population std of 10,20,30,40 = sqrt(125)
        assert!((summary.std_dev_ms - 125f64.sqrt()).abs() < 1e-9);
        assert_eq!(summary.min_ms, 10);
        assert_eq!(summary.max_ms, 40);
    }

    #[test]
    fn test_zero_factor_keeps_interquartile_values_only() {
        let values = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        let filtered = filter_outliers(&values, 0.0).unwrap();
        assert_eq!(filtered.retained, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_population_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(population_std_dev(&values, m), 2.0);
        assert_eq!(population_std_dev(&[3.0], 3.0), 0.0);
    }
}
