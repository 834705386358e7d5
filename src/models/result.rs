//! Probe result data model
//!
//! A serializable record of one completed probe run, as kept in the
//! result history.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bench::ProbeReport;

/// Outcome of one probe run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Probed file
    pub target_path: PathBuf,
    /// File size at validation time, in bytes
    pub file_size: u64,
    /// Bytes read per sample
    pub probe_size: u64,
    /// Number of measured reads
    pub sample_count: u64,
    /// Seed the offset generator was initialised with
    pub seed: u64,
    /// Median latency in microseconds
    pub median_us: f64,
    /// Fastest sample in microseconds
    pub min_us: f64,
    /// Slowest sample in microseconds
    pub max_us: f64,
    /// Wall time of the sampling loop
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl ProbeResult {
    /// Build a result stamped with the current time.
    pub fn from_report(target_path: PathBuf, seed: u64, report: &ProbeReport) -> Self {
        Self {
            timestamp: Utc::now(),
            target_path,
            file_size: report.space.file_size,
            probe_size: report.space.probe_size,
            sample_count: report.samples.len() as u64,
            seed,
            median_us: report.median_us,
            min_us: report.samples.min().unwrap_or(0.0),
            max_us: report.samples.max().unwrap_or(0.0),
            elapsed: report.elapsed,
        }
    }

    /// One-line human-readable summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} - {} - {} B x {} - median {:.2}us (min {:.2}us, max {:.2}us)",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.target_path.display(),
            self.probe_size,
            self.sample_count,
            self.median_us,
            self.min_us,
            self.max_us
        )
    }
}

// Duration as integer nanoseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_nanos())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
