// Logging - tracing subscriber setup
//
// RUST_LOG wins when set; otherwise the verbosity flag picks the level.
// While the console owns the terminal, logs go to a file or nowhere.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)))
}

pub fn init(target: LogTarget<'_>, verbose: u8) -> Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
                .init();
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            fmt()
                .with_env_filter(env_filter(verbose))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            Ok(())
        }
    }
}
