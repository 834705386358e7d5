//! Configuration management module
//!
//! Holds the immutable description of one run, the optional settings
//! file and the result history store.

use std::path::PathBuf;

use crate::{IoLatError, Result};

pub mod persistence;
pub mod settings;

pub use persistence::ResultsStorage;
pub use settings::{ResultsSettings, Settings};

/// Which operation a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkMode {
    /// Mode 1: write a zero-filled file
    Create,
    /// Mode 2: measure random read latency
    Probe,
}

impl BenchmarkMode {
    /// Parse the numeric mode argument. Only the exact strings `1` and `2`
    /// (surrounding whitespace aside) select a mode.
    pub fn from_arg(arg: &str) -> Result<Self> {
        match arg.trim() {
            "1" => Ok(BenchmarkMode::Create),
            "2" => Ok(BenchmarkMode::Probe),
            other => Err(IoLatError::InvalidMode(other.to_string())),
        }
    }

    /// Positional arguments after the mode, for usage messages
    pub fn usage(&self) -> &'static str {
        match self {
            BenchmarkMode::Create => "1 <filename> <blocks>",
            BenchmarkMode::Probe => "2 <filename> <probe_size> <samples>",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BenchmarkMode::Create => "Create",
            BenchmarkMode::Probe => "Probe",
        }
    }
}

/// Parameters of one run. Fully determines what the run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub mode: BenchmarkMode,
    pub target_path: PathBuf,
    /// Block count for create, bytes per read for probe
    pub size_param: i64,
    /// Probe only
    pub sample_count: Option<i64>,
}

impl BenchmarkConfig {
    /// Configuration for writing `blocks` zero blocks to `path`
    pub fn create(path: impl Into<PathBuf>, blocks: i64) -> Self {
        Self {
            mode: BenchmarkMode::Create,
            target_path: path.into(),
            size_param: blocks,
            sample_count: None,
        }
    }

    /// Configuration for `samples` reads of `probe_size` bytes from `path`
    pub fn probe(path: impl Into<PathBuf>, probe_size: i64, samples: i64) -> Self {
        Self {
            mode: BenchmarkMode::Probe,
            target_path: path.into(),
            size_param: probe_size,
            sample_count: Some(samples),
        }
    }

    /// Check arity and ranges. Does not touch the filesystem.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            BenchmarkMode::Create => {
                if self.sample_count.is_some() {
                    return Err(self.usage_error());
                }
                if self.size_param <= 0 {
                    return Err(IoLatError::Validation(format!(
                        "Invalid block count: {}",
                        self.size_param
                    )));
                }
            }
            BenchmarkMode::Probe => {
                let samples = self.sample_count.ok_or_else(|| self.usage_error())?;
                if self.size_param <= 0 || samples <= 0 {
                    return Err(IoLatError::Validation(format!(
                        "Invalid probe size or samples: {} {}",
                        self.size_param, samples
                    )));
                }
            }
        }
        Ok(())
    }

    /// Block count for create mode; meaningful after `validate`
    pub fn block_count(&self) -> u64 {
        self.size_param.max(0) as u64
    }

    /// Bytes per read for probe mode; meaningful after `validate`
    pub fn probe_size(&self) -> u64 {
        self.size_param.max(0) as u64
    }

    /// Sample count for probe mode; meaningful after `validate`
    pub fn samples(&self) -> u64 {
        self.sample_count.unwrap_or(0).max(0) as u64
    }

    fn usage_error(&self) -> IoLatError {
        IoLatError::Usage(format!(
            "Usage: {} {}",
            crate::APP_NAME,
            self.mode.usage()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_arg() {
        assert_eq!(BenchmarkMode::from_arg("1").unwrap(), BenchmarkMode::Create);
        assert_eq!(BenchmarkMode::from_arg("2").unwrap(), BenchmarkMode::Probe);
        for bad in ["0", "3", "9", "-1", "01", "1x", "+2", "create", ""] {
            let err = BenchmarkMode::from_arg(bad).unwrap_err();
            assert!(err.to_string().starts_with("Invalid mode"));
        }
    }

    #[test]
    fn test_mode_usage() {
        assert!(BenchmarkMode::Create.usage().ends_with("<blocks>"));
        assert!(BenchmarkMode::Probe.usage().ends_with("<samples>"));
    }

    #[test]
    fn test_create_validation() {
        assert!(BenchmarkConfig::create("f", 1).validate().is_ok());
        for blocks in [0, -1, i64::MIN] {
            let err = BenchmarkConfig::create("f", blocks).validate().unwrap_err();
            assert_eq!(err.category(), "validation");
        }
    }

    #[test]
    fn test_create_rejects_sample_count() {
        let mut config = BenchmarkConfig::create("f", 4);
        config.sample_count = Some(5);
        let err = config.validate().unwrap_err();
        assert_eq!(err.category(), "usage");
        assert!(err.to_string().contains("<blocks>"));
    }

    #[test]
    fn test_probe_validation() {
        assert!(BenchmarkConfig::probe("f", 4096, 5).validate().is_ok());
        assert!(BenchmarkConfig::probe("f", 0, 5).validate().is_err());
        assert!(BenchmarkConfig::probe("f", 4096, 0).validate().is_err());
        assert!(BenchmarkConfig::probe("f", 4096, -3).validate().is_err());

        let mut missing = BenchmarkConfig::probe("f", 4096, 5);
        missing.sample_count = None;
        assert_eq!(missing.validate().unwrap_err().category(), "usage");
    }

    #[test]
    fn test_accessors() {
        let probe = BenchmarkConfig::probe("/data/f", 8192, 100);
        assert_eq!(probe.probe_size(), 8192);
        assert_eq!(probe.samples(), 100);
        assert_eq!(BenchmarkConfig::create("f", 12).block_count(), 12);
    }
}
