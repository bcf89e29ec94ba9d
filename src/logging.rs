use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

const LOG_FILE_NAME: &str = "sb_terminal.log";
const DEFAULT_DIRECTIVE: &str = "sb_terminal=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// File-only logging for the terminal UI; the screen is in raw mode so
/// nothing may reach stdout. Keep the guard alive until exit so buffered
/// lines get flushed.
pub fn init_file_logging(cfg: &Config) -> Result<(PathBuf, WorkerGuard)> {
    fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("failed to create log dir {}", cfg.log_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &cfg.log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .try_init()
        .context("logging already initialized")?;

    Ok((cfg.log_dir.join(LOG_FILE_NAME), guard))
}

/// Stderr logging for headless binaries.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter()),
        )
        .try_init();
}
