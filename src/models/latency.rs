//! Per-operation latency samples and the median summary

use std::time::Duration;

use crate::io::buffer;
use crate::Result;

/// Convert a measured interval to floating-point microseconds,
/// keeping the sub-microsecond part.
pub fn duration_to_micros(elapsed: Duration) -> f64 {
    elapsed.as_secs() as f64 * 1e6 + f64::from(elapsed.subsec_nanos()) / 1e3
}

/// Median of `values`, sorting them in place.
///
/// Even-length input yields the mean of the two middle values.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

/// Latency measurements for one run, in microseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencySamples {
    values: Vec<f64>,
}

impl LatencySamples {
    /// Preallocate room for `count` samples.
    pub fn with_capacity(count: usize) -> Result<Self> {
        Ok(Self {
            values: buffer::preallocate(count)?,
        })
    }

    pub fn push(&mut self, elapsed: Duration) {
        self.values.push(duration_to_micros(elapsed));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Samples in collection order, or ascending once `median` has run
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn median(&mut self) -> Option<f64> {
        median(&mut self.values)
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().min_by(f64::total_cmp)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().max_by(f64::total_cmp)
    }
}

impl From<Vec<f64>> for LatencySamples {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Two-decimal rendering used for the single output line
pub fn format_median(median_us: f64) -> String {
    format!("{:.2}", median_us)
}
