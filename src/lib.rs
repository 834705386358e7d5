//! IOLAT - storage I/O latency probe
//!
//! Creates zero-filled test files and measures the median latency of
//! block-aligned random reads against an existing file.

use std::path::PathBuf;

use thiserror::Error;

pub mod bench;
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod runner;
pub mod util;

/// Errors produced anywhere in a run. Every variant is fatal.
#[derive(Debug, Error)]
pub enum IoLatError {
    /// Bad, missing or extra command line arguments
    #[error("{0}")]
    Usage(String),
    /// Mode argument is neither create nor probe
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    /// Size or sample parameters out of range
    #[error("{0}")]
    Validation(String),
    /// A system call failed
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A single read or write moved fewer bytes than requested
    #[error("{op}: short transfer ({actual} of {expected} bytes)")]
    ShortTransfer {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Buffer allocation failed
    #[error("malloc: unable to allocate {bytes} bytes")]
    Allocation { bytes: usize },
    /// Settings file could not be located, read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
    /// Result history could not be read or written
    #[error("Results persistence error: {0}")]
    Persistence(String),
}

impl IoLatError {
    /// Wrap an `std::io::Error` with the failing operation and path.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoLatError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Coarse error class, used in log records and by tests.
    pub fn category(&self) -> &'static str {
        match self {
            IoLatError::Usage(_) | IoLatError::InvalidMode(_) => "usage",
            IoLatError::Validation(_) => "validation",
            IoLatError::Io { .. } | IoLatError::ShortTransfer { .. } => "io",
            IoLatError::Allocation { .. } => "allocation",
            IoLatError::Config(_) | IoLatError::Persistence(_) => "config",
        }
    }
}

impl From<serde_json::Error> for IoLatError {
    fn from(err: serde_json::Error) -> Self {
        IoLatError::Persistence(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for IoLatError {
    fn from(err: toml::de::Error) -> Self {
        IoLatError::Config(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for IOLAT operations
pub type Result<T> = std::result::Result<T, IoLatError>;

/// Error reporting helpers used at the process boundary
pub mod error {
    use super::IoLatError;

    /// Process exit status for a failed run.
    pub fn exit_code(_error: &IoLatError) -> u8 {
        1
    }

    /// Optional follow-up line printed under the diagnostic.
    pub fn hint(error: &IoLatError) -> Option<&'static str> {
        match error {
            IoLatError::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    Some("Check file permissions or choose a different location.")
                }
                std::io::ErrorKind::NotFound => {
                    Some("Create the file first with mode 1 or check the path.")
                }
                _ => None,
            },
            IoLatError::ShortTransfer { op: "write", .. } => {
                Some("The device may be full; free up space or choose a smaller block count.")
            }
            IoLatError::InvalidMode(_) => Some("Use mode 1 (create) or mode 2 (probe)."),
            _ => None,
        }
    }
}

// Common constants
pub const APP_NAME: &str = "iolat";
pub const CONFIG_FILE: &str = "iolat.toml";
pub const RESULTS_FILE: &str = "results.json";
pub const MAX_RESULTS_HISTORY: usize = 100;

/// Unit of both the writer's fill granularity and the prober's offset alignment.
pub const BLOCK_SIZE: u64 = 4096;
