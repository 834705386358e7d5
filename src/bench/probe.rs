//! Random read latency probe
//!
//! Draws block-aligned offsets from an injected generator, times one
//! seek plus one read per sample on a monotonic clock, and reduces the
//! samples to their median.

use std::num::TryFromIntError;
use std::path::Path;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, trace};

use crate::bench::offset::OffsetSpace;
use crate::io::{buffer, BlockFile, DiskIO};
use crate::models::LatencySamples;
use crate::{IoLatError, Result, BLOCK_SIZE};

/// Everything a completed probe run produced
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub space: OffsetSpace,
    /// Samples in microseconds, sorted ascending
    pub samples: LatencySamples,
    pub median_us: f64,
    /// Wall time of the sampling loop
    pub elapsed: Duration,
}

/// Latency prober executor
pub struct LatencyProber<R> {
    probe_size: u64,
    sample_count: u64,
    rng: R,
}

impl<R: Rng> LatencyProber<R> {
    /// Create a prober reading `probe_size` bytes `sample_count` times.
    pub fn new(probe_size: u64, sample_count: u64, rng: R) -> Result<Self> {
        if probe_size == 0 || sample_count == 0 {
            return Err(IoLatError::Validation(format!(
                "Invalid probe size or sample count ({}, {})",
                probe_size, sample_count
            )));
        }
        Ok(Self {
            probe_size,
            sample_count,
            rng,
        })
    }

    /// Stat `path`, validate the probe against its size, open it read-only
    /// once and run the sampling loop on that handle.
    pub fn run(&mut self, disk_io: &dyn DiskIO, path: &Path) -> Result<ProbeReport> {
        let file_size = disk_io.file_size(path)?;
        let space = OffsetSpace::new(file_size, self.probe_size, BLOCK_SIZE)?;
        debug!(
            path = %path.display(),
            file_size,
            max_offset = space.max_offset,
            block_count = space.block_count,
            "offset space computed"
        );

        let mut file = disk_io.open_read(path)?;
        self.sample(file.as_mut(), space, path, |_| {})
    }

    /// Sampling loop over an already opened handle.
    ///
    /// `observe` sees every drawn offset before it is read. Any seek or read
    /// failure aborts the run and discards the samples taken so far.
    pub fn sample<F>(
        &mut self,
        file: &mut dyn BlockFile,
        space: OffsetSpace,
        path: &Path,
        mut observe: F,
    ) -> Result<ProbeReport>
    where
        F: FnMut(u64),
    {
        let too_large = |_: TryFromIntError| IoLatError::Allocation { bytes: usize::MAX };
        let probe_len = usize::try_from(self.probe_size).map_err(too_large)?;
        let sample_len = usize::try_from(self.sample_count).map_err(too_large)?;
        let mut buffer = buffer::zeroed(probe_len)?;
        let mut samples = LatencySamples::with_capacity(sample_len)?;

        let loop_start = Instant::now();
        for i in 0..self.sample_count {
            let offset = space.sample(&mut self.rng);
            observe(offset);

            let start = Instant::now();
            file.seek_block(offset)
                .map_err(|e| IoLatError::io("lseek", path, e))?;
            let read = file
                .read_block(&mut buffer)
                .map_err(|e| IoLatError::io("read", path, e))?;
            let elapsed = start.elapsed();

            if read != probe_len {
                return Err(IoLatError::ShortTransfer {
                    op: "read",
                    expected: probe_len,
                    actual: read,
                });
            }
            trace!(sample = i, offset, elapsed_ns = elapsed.as_nanos() as u64, "probe");
            samples.push(elapsed);
        }
        let elapsed = loop_start.elapsed();

        let median_us = samples
            .median()
            .ok_or_else(|| IoLatError::Validation("No latency samples collected".to_string()))?;
        info!(
            samples = samples.len(),
            median_us,
            elapsed_ms = elapsed.as_millis() as u64,
            "probe complete"
        );

        Ok(ProbeReport {
            space,
            samples,
            median_us,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::PlatformDiskIO;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::io;
    use tempfile::tempdir;

    /// In-memory file that can fail or shorten a chosen read
    struct FakeFile {
        len: u64,
        pos: u64,
        reads: usize,
        short_on: Option<usize>,
        fail_seek_on: Option<usize>,
        seeks: usize,
    }

    impl FakeFile {
        fn new(len: u64) -> Self {
            Self {
                len,
                pos: 0,
                reads: 0,
                short_on: None,
                fail_seek_on: None,
                seeks: 0,
            }
        }
    }

    impl BlockFile for FakeFile {
        fn write_block(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.short_on == Some(self.reads) {
                return Ok(buf.len() / 2);
            }
            let available = self.len.saturating_sub(self.pos) as usize;
            Ok(available.min(buf.len()))
        }

        fn seek_block(&mut self, offset: u64) -> io::Result<u64> {
            self.seeks += 1;
            if self.fail_seek_on == Some(self.seeks) {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, "Invalid argument"));
            }
            self.pos = offset;
            Ok(offset)
        }

        fn sync_all(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn prober(probe_size: u64, samples: u64) -> LatencyProber<SmallRng> {
        LatencyProber::new(probe_size, samples, SmallRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let rng = SmallRng::seed_from_u64(0);
        assert!(LatencyProber::new(0, 5, rng.clone()).is_err());
        let err = LatencyProber::new(4096, 0, rng).err().unwrap();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_collects_exactly_sample_count() {
        let space = OffsetSpace::new(64 * 4096, 4096, BLOCK_SIZE).unwrap();
        let mut file = FakeFile::new(64 * 4096);
        let mut offsets = Vec::new();

        let report = prober(4096, 25)
            .sample(&mut file, space, Path::new("fake"), |o| offsets.push(o))
            .unwrap();

        assert_eq!(report.samples.len(), 25);
        assert_eq!(file.reads, 25);
        assert_eq!(file.seeks, 25);
        assert_eq!(offsets.len(), 25);
        assert!(offsets
            .iter()
            .all(|&o| o % BLOCK_SIZE == 0 && o <= space.block_count * BLOCK_SIZE));
        assert!(report.median_us >= 0.0);
        assert!(report.samples.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_same_seed_draws_same_offsets() {
        let space = OffsetSpace::new(256 * 4096, 512, BLOCK_SIZE).unwrap();
        let mut first = Vec::new();
        let mut second = Vec::new();
        prober(512, 40)
            .sample(&mut FakeFile::new(256 * 4096), space, Path::new("a"), |o| {
                first.push(o)
            })
            .unwrap();
        prober(512, 40)
            .sample(&mut FakeFile::new(256 * 4096), space, Path::new("b"), |o| {
                second.push(o)
            })
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_read_aborts_run() {
        let space = OffsetSpace::new(16 * 4096, 4096, BLOCK_SIZE).unwrap();
        let mut file = FakeFile::new(16 * 4096);
        file.short_on = Some(3);

        let err = prober(4096, 10)
            .sample(&mut file, space, Path::new("fake"), |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            IoLatError::ShortTransfer {
                op: "read",
                expected: 4096,
                actual: 2048
            }
        ));
        assert_eq!(file.reads, 3);
    }

    #[test]
    fn test_seek_failure_aborts_run() {
        let space = OffsetSpace::new(16 * 4096, 4096, BLOCK_SIZE).unwrap();
        let mut file = FakeFile::new(16 * 4096);
        file.fail_seek_on = Some(2);

        let err = prober(4096, 10)
            .sample(&mut file, space, Path::new("/dev/fake"), |_| {})
            .unwrap_err();
        assert!(err.to_string().starts_with("lseek /dev/fake:"));
        assert_eq!(file.reads, 1);
    }

    #[test]
    fn test_run_on_real_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.bin");
        std::fs::write(&path, vec![0u8; 32 * 4096]).unwrap();

        let report = prober(8192, 11).run(&PlatformDiskIO::new(), &path).unwrap();
        assert_eq!(report.space.file_size, 32 * 4096);
        assert_eq!(report.space.block_count, 30);
        assert_eq!(report.samples.len(), 11);
        assert_eq!(report.median_us, report.samples.as_slice()[5]);
    }

    #[test]
    fn test_run_rejects_probe_larger_than_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.bin");
        std::fs::write(&path, vec![0u8; 4095]).unwrap();

        let err = prober(4096, 3)
            .run(&PlatformDiskIO::new(), &path)
            .unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_run_missing_file_is_stat_error() {
        let dir = tempdir().unwrap();
        let err = prober(4096, 3)
            .run(&PlatformDiskIO::new(), &dir.path().join("missing"))
            .unwrap_err();
        assert!(err.to_string().starts_with("stat "));
    }
}
