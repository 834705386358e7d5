//! Command line interface
//!
//! `iolat <mode> <filename> <size_param> [sample_count]`, plus optional
//! flags that never change what is printed on stdout.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{BenchmarkConfig, BenchmarkMode};
use crate::runner::RunOptions;
use crate::{IoLatError, Result, APP_NAME};

#[derive(Parser, Debug)]
#[command(name = "iolat")]
#[command(version, about = "Storage random read latency probe", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// 1 = create a zero-filled file, 2 = probe random read latency
    pub mode: String,

    /// Target file
    pub filename: Option<PathBuf>,

    /// Block count (mode 1) or bytes per read (mode 2)
    pub size_param: Option<String>,

    /// Number of timed reads (mode 2 only)
    pub sample_count: Option<String>,

    /// Surplus positionals, rejected once the mode has been checked
    #[arg(hide = true, num_args = 0..)]
    pub extra: Vec<String>,

    /// Seed for the offset generator (default: current time in seconds)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Settings file (default: $CONFIG_HOME/iolat/iolat.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append the probe result to the result history
    #[arg(long)]
    pub record: bool,

    /// Result history file (default: $DATA_HOME/iolat/results.json)
    #[arg(long, value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Show a progress bar on stderr while creating a file
    #[arg(long)]
    pub progress: bool,
}

/// What parsing produced: arguments to run, or text clap wants printed
/// before a successful exit (help, version).
#[derive(Debug)]
pub enum Parsed {
    Run(Box<Cli>),
    Exit(clap::Error),
}

impl Cli {
    /// Parse `args`, mapping every clap failure to a usage error.
    pub fn parse_args<I, T>(args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(Parsed::Run(Box::new(cli))),
            Err(err)
                if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
            {
                Ok(Parsed::Exit(err))
            }
            Err(err) => Err(IoLatError::Usage(err.render().to_string().trim_end().to_string())),
        }
    }

    /// Check the mode first, then the arguments that mode needs.
    pub fn to_config(&self) -> Result<BenchmarkConfig> {
        let mode = BenchmarkMode::from_arg(&self.mode)?;
        let usage = || IoLatError::Usage(format!("Usage: {} {}", APP_NAME, mode.usage()));

        let (Some(filename), Some(size_param)) = (&self.filename, &self.size_param) else {
            return Err(usage());
        };
        if !self.extra.is_empty() {
            return Err(usage());
        }

        let config = match mode {
            BenchmarkMode::Create => {
                if self.sample_count.is_some() {
                    return Err(usage());
                }
                BenchmarkConfig::create(filename, parse_int("block count", size_param)?)
            }
            BenchmarkMode::Probe => {
                let samples = self.sample_count.as_deref().ok_or_else(usage)?;
                BenchmarkConfig::probe(
                    filename,
                    parse_int("probe size", size_param)?,
                    parse_int("sample count", samples)?,
                )
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            seed: self.seed,
            record: self.record,
            results_file: self.results_file.clone(),
            progress: self.progress,
        }
    }
}

fn parse_int(what: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| IoLatError::Usage(format!("Invalid {}: {:?}", what, value)))
}
