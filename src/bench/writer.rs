//! Sequential zero-fill writer
//!
//! Creates a file of `block_count` zeroed blocks in file order and
//! fsyncs it before reporting success.

use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::io::{buffer, BlockFile, DiskIO};
use crate::{IoLatError, Result, BLOCK_SIZE};

/// Summary of a completed fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub blocks_written: u64,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Zero-fill writer executor. Blocks are always `BLOCK_SIZE` bytes.
#[derive(Debug, Clone)]
pub struct Writer {
    show_progress: bool,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self { show_progress: false }
    }

    /// Draw a progress bar on stderr while writing
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Create or truncate `path` and fill it with `block_count` zero blocks.
    ///
    /// A failed run leaves whatever was written in place.
    pub fn run(&self, disk_io: &dyn DiskIO, path: &Path, block_count: u64) -> Result<WriteReport> {
        if block_count == 0 {
            return Err(IoLatError::Validation(
                "Block count must be greater than 0".to_string(),
            ));
        }
        let mut file = disk_io.create_truncate(path)?;
        debug!(path = %path.display(), block_count, "file created");
        self.fill(file.as_mut(), path, block_count)
    }

    /// Write the blocks through an opened handle, then fsync it.
    pub fn fill(
        &self,
        file: &mut dyn BlockFile,
        path: &Path,
        block_count: u64,
    ) -> Result<WriteReport> {
        let block_len = usize::try_from(BLOCK_SIZE)
            .map_err(|_| IoLatError::Allocation { bytes: usize::MAX })?;
        let block = buffer::zeroed(block_len)?;
        let progress = self.progress_bar(block_count);

        let start = Instant::now();
        for _ in 0..block_count {
            let written = file
                .write_block(&block)
                .map_err(|e| IoLatError::io("write", path, e))?;
            if written != block_len {
                return Err(IoLatError::ShortTransfer {
                    op: "write",
                    expected: block_len,
                    actual: written,
                });
            }
            progress.inc(BLOCK_SIZE);
        }
        file.sync_all()
            .map_err(|e| IoLatError::io("fsync", path, e))?;
        progress.finish_and_clear();

        let report = WriteReport {
            blocks_written: block_count,
            bytes_written: block_count * BLOCK_SIZE,
            elapsed: start.elapsed(),
        };
        info!(
            path = %path.display(),
            bytes = report.bytes_written,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "file written and synced"
        );
        Ok(report)
    }

    fn progress_bar(&self, block_count: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(block_count.saturating_mul(BLOCK_SIZE));
        let style = ProgressStyle::with_template("{spinner} {bytes}/{total_bytes} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}
