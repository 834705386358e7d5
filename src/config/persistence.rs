//! Results persistence module
//!
//! Keeps a bounded JSON history of probe results.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::ProbeResult;
use crate::{IoLatError, Result, APP_NAME, MAX_RESULTS_HISTORY, RESULTS_FILE};

/// Results storage manager
#[derive(Debug)]
pub struct ResultsStorage {
    results_path: PathBuf,
}

/// On-disk layout of the history file
#[derive(Debug, Serialize, Deserialize)]
struct ResultsFile {
    version: u32,
    results: Vec<ProbeResult>,
}

impl ResultsStorage {
    /// Storage at `path`, or at the standard location when `None`
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let results_path = match path {
            Some(path) => path,
            None => Self::results_file_path()?,
        };
        Ok(Self { results_path })
    }

    /// Standard results file path
    /// Uses $DATA_HOME/iolat/results.json
    pub fn results_file_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            IoLatError::Persistence("Unable to determine data directory".to_string())
        })?;
        Ok(data_dir.join(APP_NAME).join(RESULTS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.results_path
    }

    /// Load all results, oldest first
    pub fn load_results(&self) -> Result<Vec<ProbeResult>> {
        if !self.results_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.results_path).map_err(|e| {
            IoLatError::Persistence(format!(
                "Failed to read results file {}: {}",
                self.results_path.display(),
                e
            ))
        })?;
        let results_file: ResultsFile = serde_json::from_str(&content).map_err(|e| {
            IoLatError::Persistence(format!(
                "Failed to parse results file {}: {}",
                self.results_path.display(),
                e
            ))
        })?;
        Ok(results_file.results)
    }

    /// Append a result, dropping the oldest beyond `MAX_RESULTS_HISTORY`
    pub fn append_result(&self, result: ProbeResult) -> Result<()> {
        let mut results = self.load_results()?;
        results.push(result);
        if results.len() > MAX_RESULTS_HISTORY {
            let excess = results.len() - MAX_RESULTS_HISTORY;
            results.drain(..excess);
        }
        self.save_results(results)
    }

    fn save_results(&self, results: Vec<ProbeResult>) -> Result<()> {
        if let Some(parent) = self.results_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    IoLatError::Persistence(format!(
                        "Failed to create results directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&ResultsFile {
            version: 1,
            results,
        })?;
        fs::write(&self.results_path, content).map_err(|e| {
            IoLatError::Persistence(format!(
                "Failed to write results file {}: {}",
                self.results_path.display(),
                e
            ))
        })
    }
}
