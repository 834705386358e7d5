//! Run dispatch
//!
//! Turns a validated `BenchmarkConfig` into a writer or prober run and
//! handles seeding and result recording around it.

use std::path::PathBuf;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::bench::{LatencyProber, WriteReport, Writer};
use crate::config::{BenchmarkConfig, BenchmarkMode, ResultsStorage, Settings};
use crate::io::{create_disk_io, DiskIO};
use crate::models::{format_median, ProbeResult};
use crate::util::units::{
    calculate_throughput_mbps, format_bytes, format_latency_us, format_throughput,
};
use crate::Result;

/// Run modifiers from command line flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub seed: Option<u64>,
    pub record: bool,
    pub results_file: Option<PathBuf>,
    pub progress: bool,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Created(WriteReport),
    Probed(ProbeResult),
}

impl RunOutcome {
    /// The line printed on stdout, if the mode prints one
    pub fn stdout_line(&self) -> Option<String> {
        match self {
            RunOutcome::Created(_) => None,
            RunOutcome::Probed(result) => Some(format_median(result.median_us)),
        }
    }
}

/// Seed from wall-clock seconds. Runs started within the same second
/// draw the same offsets.
pub fn wall_clock_seed() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Flag beats settings file beats wall clock
pub fn resolve_seed(options: &RunOptions, settings: &Settings) -> u64 {
    options
        .seed
        .or(settings.seed)
        .unwrap_or_else(wall_clock_seed)
}

/// Run against the real filesystem
pub fn run(
    config: &BenchmarkConfig,
    options: &RunOptions,
    settings: &Settings,
) -> Result<RunOutcome> {
    run_with(&create_disk_io(), config, options, settings)
}

/// Run with an explicit disk I/O implementation
pub fn run_with(
    disk_io: &dyn DiskIO,
    config: &BenchmarkConfig,
    options: &RunOptions,
    settings: &Settings,
) -> Result<RunOutcome> {
    config.validate()?;
    debug!(mode = config.mode.description(), path = %config.target_path.display(), "run start");

    match config.mode {
        BenchmarkMode::Create => {
            let report = Writer::new().with_progress(options.progress).run(
                disk_io,
                &config.target_path,
                config.block_count(),
            )?;
            info!(
                "created {} ({} at {})",
                config.target_path.display(),
                format_bytes(report.bytes_written),
                format_throughput(calculate_throughput_mbps(
                    report.bytes_written,
                    report.elapsed
                ))
            );
            Ok(RunOutcome::Created(report))
        }
        BenchmarkMode::Probe => {
            let seed = resolve_seed(options, settings);
            debug!(seed, "offset generator seeded");

            let mut prober = LatencyProber::new(
                config.probe_size(),
                config.samples(),
                SmallRng::seed_from_u64(seed),
            )?;
            let report = prober.run(disk_io, &config.target_path)?;
            let result = ProbeResult::from_report(config.target_path.clone(), seed, &report);
            info!(
                "median {} over {} reads",
                format_latency_us(result.median_us),
                result.sample_count
            );

            if options.record || settings.results.record {
                let path = options
                    .results_file
                    .clone()
                    .or_else(|| settings.results.path.clone());
                let storage = ResultsStorage::new(path)?;
                storage.append_result(result.clone())?;
                debug!(path = %storage.path().display(), "result recorded");
            }
            Ok(RunOutcome::Probed(result))
        }
    }
}
