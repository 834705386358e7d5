use std::io::{self, Write};
use std::process::ExitCode;

use iolat::cli::{Cli, Parsed};
use iolat::config::{BenchmarkMode, Settings};
use iolat::{error, runner, IoLatError, Result, APP_NAME};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Exit(info)) => info.exit(),
        Err(err) => return report(&err),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Arguments are fully checked before anything on disk is read.
    let config = cli.to_config()?;
    let (settings, ignored) = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => (settings, None),
        // No setting affects create mode.
        Err(err) if config.mode == BenchmarkMode::Create => (Settings::default(), Some(err)),
        Err(err) => return Err(err),
    };
    init_logging(&settings);
    match ignored {
        Some(err) => warn!("{}; using default settings", err),
        None => debug!(
            seed = ?settings.seed,
            record = settings.results.record,
            "settings loaded"
        ),
    }

    let outcome = runner::run(&config, &cli.run_options(), &settings)?;
    if let Some(line) = outcome.stdout_line() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)
            .and_then(|()| stdout.flush())
            .map_err(|e| IoLatError::io("write", "<stdout>", e))?;
    }
    Ok(())
}

/// Logs go to stderr; stdout carries only the median.
fn init_logging(settings: &Settings) {
    let default_level = settings.log_level.as_deref().unwrap_or("warn");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(err: &IoLatError) -> ExitCode {
    eprintln!("{}: {}", APP_NAME, err);
    if let Some(hint) = error::hint(err) {
        eprintln!("{}: {}", APP_NAME, hint);
    }
    ExitCode::from(error::exit_code(err))
}
