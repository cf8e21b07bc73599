//! Tracing subscriber setup.
//!
//! Logs go to stderr (or a file with `--log-file`) so stdout stays clean
//! for issue output.
//!
//! # Level (highest priority first)
//!
//! 1. `RUST_LOG`
//! 2. CLI flags: `-q` error, `-v` info, `-vv`/`--debug` debug, `-vvv` trace
//! 3. Default: warn

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Map CLI verbosity to a level. `quiet` wins over `verbose`.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber, optionally emitting JSON lines.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let filter = build_env_filter(level_for(verbose, quiet));
    let registry = tracing_subscriber::registry().with(filter);

    match (log_file, json) {
        (Some(path), json) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false);
            if json {
                registry.with(layer.json()).try_init()?;
            } else {
                registry.with(layer).try_init()?;
            }
        }
        (None, true) => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).json())
                .try_init()?;
        }
        (None, false) => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_ansi)
                        .without_time()
                        .compact(),
                )
                .try_init()?;
        }
    }
    Ok(())
}
