//! Equal-width histogram binning

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Counts of values in `bins` equal-width bins over `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub start: f64,
    pub end: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` across their own range.
    ///
    /// Every bin is half-open except the last, which also holds the maximum.
    /// A constant sample is centred in `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[u64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(AppError::statistics("Histogram needs at least one bin"));
        }

        let (min, max) = values
            .iter()
            .fold(None, |acc: Option<(u64, u64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or_else(|| AppError::statistics("Cannot build a histogram of an empty sample"))?;

        let (start, end) = if min == max {
            (min as f64 - 0.5, max as f64 + 0.5)
        } else {
            (min as f64, max as f64)
        };

        let mut histogram = Self {
            start,
            end,
            counts: vec![0; bins],
        };

        let width = histogram.bin_width();
        for &value in values {
            let offset = (value as f64 - start) / width;
            let index = (offset.floor() as usize).min(bins - 1);
            histogram.counts[index] += 1;
        }

        Ok(histogram)
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.counts.len() as f64
    }

    /// `bins + 1` edges from `start` to `end`
    pub fn edges(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..=self.counts.len())
            .map(|i| if i == self.counts.len() { self.end } else { self.start + width * i as f64 })
            .collect()
    }

    /// `(left, right, count)` for each bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let width = self.bin_width();
        let last = self.counts.len() - 1;
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let left = self.start + width * i as f64;
            let right = if i == last { self.end } else { left + width };
            (left, right, count)
        })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
