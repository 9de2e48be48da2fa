//! Tracing setup
//!
//! The interactive mode owns the terminal, so log output goes to a file.
//! Headless runs may log to stderr instead.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter '{directives}'"))
}

/// Append log lines to `path`, filtered by `directives` (e.g. `info` or `tui_2048=debug`)
pub fn init_file_logging(path: &Path, directives: &str) -> Result<()> {
    let filter = filter(directives)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}

/// Log to stderr; only for modes that do not draw on the terminal
pub fn init_stderr_logging(directives: &str) -> Result<()> {
    let filter = filter(directives)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}
